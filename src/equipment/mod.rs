//! Equipment reference data: PV modules, inverters, and per-tracker array wiring.

/// Per-tracker string wiring and global calculation parameters.
pub mod array;
/// Inverter datasheet record and MPPT range parsing.
pub mod inverter;
/// PV module datasheet record and temperature compensation.
pub mod module;

use serde::{Deserialize, Serialize};

pub use array::{CalculationParameters, StringConfiguration};
pub use inverter::{Inverter, MpptRange, RangeParseError};
pub use module::PvModule;

/// Identifies a catalog record by manufacturer and model name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductRef {
    pub manufacturer: String,
    pub model: String,
}

impl ProductRef {
    pub fn new(manufacturer: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
        }
    }

    /// Returns `true` when `manufacturer` and `model` name this record.
    ///
    /// Comparison ignores ASCII case and surrounding whitespace.
    pub fn matches(&self, manufacturer: &str, model: &str) -> bool {
        self.manufacturer
            .trim()
            .eq_ignore_ascii_case(manufacturer.trim())
            && self.model.trim().eq_ignore_ascii_case(model.trim())
    }
}

impl std::fmt::Display for ProductRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.manufacturer, self.model)
    }
}
