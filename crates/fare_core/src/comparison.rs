//! Comparison math and the presenter contract.

use serde::{Deserialize, Serialize};

use crate::pricing::PriceQuote;
use crate::trip::RideClass;

/// Which quote wins the comparison. Ties go to the primary provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheaperSide {
    Primary,
    Competitor,
}

/// Outcome of comparing the primary quote against the derived competitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub primary: PriceQuote,
    pub competitor: PriceQuote,
    pub savings_amount: i64,
    pub savings_percent: u32,
    pub cheaper_side: CheaperSide,
}

impl ComparisonResult {
    /// Savings are relative to the primary amount:
    /// `round(|primary - competitor| / primary * 100)`.
    pub fn build(primary: PriceQuote, competitor: PriceQuote) -> Self {
        let savings_amount = (primary.amount - competitor.amount).abs();
        let savings_percent = if primary.amount > 0 {
            ((savings_amount as f64 / primary.amount as f64) * 100.0).round() as u32
        } else {
            0
        };
        let cheaper_side = if competitor.amount < primary.amount {
            CheaperSide::Competitor
        } else {
            CheaperSide::Primary
        };
        Self {
            primary,
            competitor,
            savings_amount,
            savings_percent,
            cheaper_side,
        }
    }
}

/// Everything the rendering layer needs to present a comparison. This is the
/// parameter bag handed to the navigation collaborator; the core has no
/// opinion on how (or whether) it is displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub primary_amount: i64,
    pub competitor_amount: i64,
    pub currency: String,
    pub cheaper_side: CheaperSide,
    pub savings_amount: i64,
    pub savings_percent: u32,
    pub ride_class: RideClass,
    pub distance_km: f64,
    pub eta_minutes: u32,
    pub pickup_label: String,
    pub destination_label: String,
    /// Set whenever the primary quote is not live pricing; the UI attaches a
    /// non-blocking "approximate pricing" note.
    pub approximate_pricing: bool,
    /// First name from the session profile, when one is available.
    pub rider_name: Option<String>,
}
