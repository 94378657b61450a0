//! Model persistence: one JSON file at a fixed path, overwritten by every
//! training run.

use crate::application::ml::gru::GruRegressor;
use crate::domain::errors::PredictError;
use anyhow::Context;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of a resume-or-initialize load. The fallback to a fresh model is
/// deliberate behavior, not an error, so it is a tagged variant instead of a
/// hidden branch.
pub enum ModelSource {
    Resumed(GruRegressor),
    Fresh(GruRegressor),
}

impl ModelSource {
    pub fn into_model(self) -> GruRegressor {
        match self {
            ModelSource::Resumed(model) | ModelSource::Fresh(model) => model,
        }
    }

    pub fn is_resumed(&self) -> bool {
        matches!(self, ModelSource::Resumed(_))
    }
}

pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read-only load for inference. Absence is `Ok(None)`; the serving
    /// layer decides whether that means an empty forecast or a 500.
    pub fn load(&self) -> Result<Option<GruRegressor>, PredictError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)
            .with_context(|| format!("failed to open model file {:?}", self.path))?;
        let model = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to deserialize model from {:?}", self.path))?;
        Ok(Some(model))
    }

    /// Resume from the persisted model, or fall back to a fresh one when it
    /// is absent or unreadable.
    pub fn resume_or_init(&self, input_size: usize) -> ModelSource {
        match self.load() {
            Ok(Some(model)) if model.input_size() == input_size => {
                info!("resuming training from {:?}", self.path);
                ModelSource::Resumed(model)
            }
            Ok(Some(model)) => {
                warn!(
                    "persisted model expects {} features, need {}; starting fresh",
                    model.input_size(),
                    input_size
                );
                ModelSource::Fresh(GruRegressor::new(input_size))
            }
            Ok(None) => {
                info!("no persisted model at {:?}, starting fresh", self.path);
                ModelSource::Fresh(GruRegressor::new(input_size))
            }
            Err(e) => {
                warn!("could not load persisted model ({e}); starting fresh");
                ModelSource::Fresh(GruRegressor::new(input_size))
            }
        }
    }

    /// Overwrites any prior version.
    pub fn save(&self, model: &GruRegressor) -> Result<(), PredictError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create model directory {:?}", parent))?;
        }

        let file = File::create(&self.path)
            .with_context(|| format!("failed to create model file {:?}", self.path))?;
        serde_json::to_writer(BufWriter::new(file), model)
            .with_context(|| format!("failed to serialize model to {:?}", self.path))?;
        info!("model saved to {:?}", self.path);
        Ok(())
    }
}
