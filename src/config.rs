//! TOML-based scenario configuration and preset definitions.
//!
//! A scenario names an inverter and the modules on each tracker by
//! manufacturer and model. [`ScenarioConfig::resolve`] looks those names up
//! in a [`Catalog`] and produces the inputs of [`crate::sizing::evaluate`].

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::equipment::{CalculationParameters, Inverter, ProductRef, StringConfiguration};
use crate::sizing::{Evaluation, evaluate};

/// Top-level scenario configuration parsed from TOML.
///
/// Every section has a default. A scenario without an `[inverter]` section
/// parses but fails [`ScenarioConfig::validate`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Temperature range and safety margin.
    #[serde(default)]
    pub parameters: CalculationParameters,
    /// Inverter to size against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverter: Option<ProductRef>,
    /// String wiring per tracker.
    #[serde(default)]
    pub trackers: Vec<TrackerConfig>,
}

/// String wiring on one tracker, referring to its module by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// 1-based tracker index (unique per scenario).
    pub index: u32,
    /// Module on this tracker; absent means none selected yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<ProductRef>,
    /// Modules in series per string (must be >= 1).
    pub modules_per_string: u32,
    /// Strings in parallel (must be >= 1).
    pub parallel_strings: u32,
    pub enabled: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            index: 1,
            module: None,
            modules_per_string: 10,
            parallel_strings: 1,
            enabled: true,
        }
    }
}

impl TrackerConfig {
    fn with_module(index: u32, manufacturer: &str, model: &str, n: u32, s: u32) -> Self {
        Self {
            index,
            module: Some(ProductRef::new(manufacturer, model)),
            modules_per_string: n,
            parallel_strings: s,
            enabled: true,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"trackers[0].index"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

/// A scenario with every catalog reference replaced by its datasheet record.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScenario {
    pub inverter: Inverter,
    pub trackers: Vec<StringConfiguration>,
    pub parameters: CalculationParameters,
}

impl ResolvedScenario {
    pub fn evaluate(&self) -> Evaluation {
        evaluate(&self.inverter, &self.trackers, &self.parameters)
    }
}

impl ScenarioConfig {
    /// Compliant two-tracker system on a 1000 V inverter.
    pub fn demo() -> Self {
        Self {
            parameters: CalculationParameters::default(),
            inverter: Some(ProductRef::new("Voltra", "V10K")),
            trackers: vec![
                TrackerConfig::with_module(1, "SunWorks", "SW-410", 14, 1),
                TrackerConfig::with_module(2, "Nordlicht", "NL-375 M", 12, 1),
            ],
        }
    }

    /// Long strings at -25 °C on a 600 V inverter; tracker 2 is switched off.
    pub fn cold_climate() -> Self {
        Self {
            parameters: CalculationParameters {
                min_temp_c: -25.0,
                max_temp_c: 35.0,
                safety_margin_pct: 5.0,
            },
            inverter: Some(ProductRef::new("Voltra", "V6K")),
            trackers: vec![
                TrackerConfig::with_module(1, "SunWorks", "SW-410", 13, 1),
                TrackerConfig {
                    enabled: false,
                    ..TrackerConfig::with_module(2, "Nordlicht", "NL-375 M", 10, 1)
                },
            ],
        }
    }

    /// Three strings of large modules on a small single-string inverter;
    /// tracker 2 has no module selected.
    pub fn oversized() -> Self {
        Self {
            parameters: CalculationParameters::default(),
            inverter: Some(ProductRef::new("Kestrel", "KS-5.0")),
            trackers: vec![
                TrackerConfig::with_module(1, "Heliona", "HX-550 Bifacial", 8, 3),
                TrackerConfig {
                    index: 2,
                    ..TrackerConfig::default()
                },
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "cold_climate", "oversized"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "cold_climate" => Ok(Self::cold_climate()),
            "oversized" => Ok(Self::oversized()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Serializes the scenario back to TOML.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Writes the scenario to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if serialization or the write fails.
    pub fn save_toml_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|e| {
            ConfigError::new("scenario", format!("cannot write \"{}\": {e}", path.display()))
        })
    }

    /// Validates the scenario structure and returns a list of errors.
    ///
    /// Parameter ranges are left to the evaluator, which reports them the
    /// same way for every caller. Returns an empty vector if the scenario
    /// is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.inverter.is_none() {
            errors.push(ConfigError::new("inverter", "an inverter must be selected"));
        }

        let mut seen = HashSet::new();
        for (i, t) in self.trackers.iter().enumerate() {
            if t.index == 0 {
                errors.push(ConfigError::new(
                    format!("trackers[{i}].index"),
                    "must be >= 1",
                ));
            } else if !seen.insert(t.index) {
                errors.push(ConfigError::new(
                    format!("trackers[{i}].index"),
                    format!("duplicate tracker index {}", t.index),
                ));
            }
            if t.modules_per_string == 0 {
                errors.push(ConfigError::new(
                    format!("trackers[{i}].modules_per_string"),
                    "must be >= 1",
                ));
            }
            if t.parallel_strings == 0 {
                errors.push(ConfigError::new(
                    format!("trackers[{i}].parallel_strings"),
                    "must be >= 1",
                ));
            }
        }

        errors
    }

    /// Looks up the inverter and every tracker module in `catalog`.
    ///
    /// # Errors
    ///
    /// Returns every reference that is missing or not found in the catalog.
    pub fn resolve(&self, catalog: &Catalog) -> Result<ResolvedScenario, Vec<ConfigError>> {
        let mut errors = Vec::new();

        let inverter = match &self.inverter {
            None => {
                errors.push(ConfigError::new("inverter", "an inverter must be selected"));
                None
            }
            Some(r) => {
                let found = catalog.find_inverter(r);
                if found.is_none() {
                    errors.push(ConfigError::new(
                        "inverter",
                        format!("inverter \"{r}\" not found in catalog"),
                    ));
                }
                found
            }
        };

        let mut trackers = Vec::with_capacity(self.trackers.len());
        for (i, t) in self.trackers.iter().enumerate() {
            let module = match &t.module {
                None => None,
                Some(r) => {
                    let found = catalog.find_module(r);
                    if found.is_none() {
                        errors.push(ConfigError::new(
                            format!("trackers[{i}].module"),
                            format!("module \"{r}\" not found in catalog"),
                        ));
                    }
                    found.cloned()
                }
            };
            trackers.push(
                StringConfiguration::new(t.index, module)
                    .with_topology(t.modules_per_string, t.parallel_strings)
                    .enabled(t.enabled),
            );
        }

        match inverter {
            Some(inverter) if errors.is_empty() => Ok(ResolvedScenario {
                inverter: inverter.clone(),
                trackers,
                parameters: self.parameters,
            }),
            _ => Err(errors),
        }
    }
}
