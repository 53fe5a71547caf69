use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// What to do with a cell whose value can not be converted to its column kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionPolicy {
    /// Reject the whole call with `TypeMismatch`; nothing is applied.
    #[default]
    Strict,
    /// Skip the offending cell with a warning and apply the rest.
    Lenient,
}

/// Store-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub conversion: ConversionPolicy,
}

impl StoreConfig {
    /// Parses a configuration such as `{"conversion": "lenient"}`.
    /// Missing fields take their defaults.
    pub fn from_json(text: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_conversion(mut self, conversion: ConversionPolicy) -> Self {
        self.conversion = conversion;
        self
    }
}
