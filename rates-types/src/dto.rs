//! Data Transfer Objects (DTOs) for rate ingestion.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

fn default_nominal() -> f64 {
    1.0
}

/// One rate as supplied by an ingestion source (e.g. a JSON import file).
///
/// The currency is referenced by code; it must already exist in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateInput {
    pub currency: String,
    pub provider: String,
    pub date: NaiveDateTime,
    pub rate: f64,
    #[serde(default = "default_nominal")]
    pub nominal: f64,
}
