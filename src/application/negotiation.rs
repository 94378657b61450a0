//! Blending of the model's fair price with the negotiating parties' prices.

use crate::domain::types::round2;

const FAIR_WEIGHT: f64 = 0.5;
const SELLER_WEIGHT: f64 = 0.25;
const BUYER_WEIGHT: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub blended_fair_price: f64,
    pub text: String,
}

/// Weighted blend of model estimate and both parties, then a suggestion for
/// the seller. Prices are compared after rounding to two decimals, so
/// "already fair" means exact equality at cent precision.
pub fn suggest(fair_estimate: f64, seller_price: f64, buyer_price: f64) -> Suggestion {
    let blended = round2(
        fair_estimate * FAIR_WEIGHT + seller_price * SELLER_WEIGHT + buyer_price * BUYER_WEIGHT,
    );
    let seller = round2(seller_price);

    let text = if seller > blended {
        format!("Seller should lower the price toward the fair price of {blended:.2}")
    } else if seller < blended {
        format!("Seller has room to raise the price toward the fair price of {blended:.2}")
    } else {
        "The seller's price is already fair".to_string()
    };

    Suggestion {
        blended_fair_price: blended,
        text,
    }
}
