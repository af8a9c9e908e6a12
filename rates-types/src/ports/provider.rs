//! Rate provider port.
//!
//! A provider is any source of rates (a central bank feed, a manual entry).
//! The store only needs its name to key the records it produced.

/// Port trait for rate providers.
pub trait RateProvider: Send + Sync {
    /// Stable name identifying the provider in stored rates.
    fn name(&self) -> &str;
}
