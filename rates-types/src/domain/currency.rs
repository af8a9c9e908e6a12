//! Currency domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a Currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyId(Uuid);

impl CurrencyId {
    /// Creates a new random CurrencyId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a CurrencyId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for CurrencyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CurrencyId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A currency identified by its ISO-like code (e.g. "USD").
///
/// The code is unique across all stored currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    pub code: String,
}

impl Currency {
    /// Creates a new, not yet persisted currency.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            id: CurrencyId::new(),
            code: code.into(),
        }
    }

    /// Reconstructs a currency from stored parts.
    pub fn from_parts(id: CurrencyId, code: String) -> Self {
        Self { id, code }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}
