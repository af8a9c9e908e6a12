//! # Rates Types
//!
//! Domain types and port traits for the currency rates store.
//! This crate has ZERO external IO dependencies - only data structures,
//! record rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Currency, CurrencyRate, RateQuery)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for ingestion boundaries
//! - `error/` - Repository and store error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Currency, CurrencyId, CurrencyRate, ProviderName, RateId, RateKey, RateQuery, normalize_date,
};
pub use dto::RateInput;
pub use error::{RepoError, StoreError};
pub use ports::{CurrencyRepository, RateProvider, RateRepository};
