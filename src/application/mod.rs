pub mod dataset;
pub mod forecaster;
pub mod indicators;
pub mod ml;
pub mod negotiation;
pub mod scaling;
pub mod service;
pub mod trainer;
