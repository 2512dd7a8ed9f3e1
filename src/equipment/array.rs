use serde::{Deserialize, Serialize};

use super::PvModule;
use crate::sizing::report::InputError;

/// Upper bound of the accepted safety margin (%).
pub const MAX_SAFETY_MARGIN_PCT: f64 = 50.0;

/// String wiring on one MPPT tracker.
///
/// A disabled configuration, or one without a module, is reported but
/// excluded from the electrical checks.
#[derive(Debug, Clone, PartialEq)]
pub struct StringConfiguration {
    /// 1-based tracker index.
    pub tracker: u32,
    /// Module used on every string of this tracker.
    pub module: Option<PvModule>,
    /// Modules wired in series per string (must be >= 1).
    pub modules_per_string: u32,
    /// Strings wired in parallel on the tracker (must be >= 1).
    pub parallel_strings: u32,
    pub enabled: bool,
}

impl StringConfiguration {
    /// Creates an enabled configuration with one string of ten modules.
    pub fn new(tracker: u32, module: Option<PvModule>) -> Self {
        Self {
            tracker,
            module,
            modules_per_string: 10,
            parallel_strings: 1,
            enabled: true,
        }
    }

    /// Builder-style setter for the series/parallel topology.
    pub fn with_topology(mut self, modules_per_string: u32, parallel_strings: u32) -> Self {
        self.modules_per_string = modules_per_string;
        self.parallel_strings = parallel_strings;
        self
    }

    /// Builder-style setter for the enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Global calculation parameters shared by every tracker in one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculationParameters {
    /// Lowest expected cell temperature (°C).
    pub min_temp_c: f64,
    /// Highest expected cell temperature (°C, must exceed `min_temp_c`).
    pub max_temp_c: f64,
    /// Safety margin applied to every inverter limit (%, 0 to 50).
    pub safety_margin_pct: f64,
}

impl Default for CalculationParameters {
    fn default() -> Self {
        Self {
            min_temp_c: -20.0,
            max_temp_c: 40.0,
            safety_margin_pct: 10.0,
        }
    }
}

impl CalculationParameters {
    /// Margin as a fraction, clamped into `[0, 0.5]`.
    pub fn margin_fraction(&self) -> f64 {
        if self.safety_margin_pct.is_nan() {
            return 0.0;
        }
        self.safety_margin_pct.clamp(0.0, MAX_SAFETY_MARGIN_PCT) / 100.0
    }

    /// Returns `true` when the temperature range supports numeric checks.
    pub fn has_valid_temperatures(&self) -> bool {
        self.min_temp_c.is_finite()
            && self.max_temp_c.is_finite()
            && self.min_temp_c < self.max_temp_c
    }

    /// Validates all fields and returns a list of problems.
    ///
    /// Returns an empty vector if the parameters are valid.
    pub fn validate(&self) -> Vec<InputError> {
        let mut errors = Vec::new();

        if !self.min_temp_c.is_finite() {
            errors.push(InputError::new("parameters.min_temp_c", "must be a finite number"));
        }
        if !self.max_temp_c.is_finite() {
            errors.push(InputError::new("parameters.max_temp_c", "must be a finite number"));
        }
        if self.min_temp_c.is_finite()
            && self.max_temp_c.is_finite()
            && self.min_temp_c >= self.max_temp_c
        {
            errors.push(InputError::new(
                "parameters.min_temp_c",
                format!(
                    "must be < parameters.max_temp_c ({} >= {})",
                    self.min_temp_c, self.max_temp_c
                ),
            ));
        }
        if !(0.0..=MAX_SAFETY_MARGIN_PCT).contains(&self.safety_margin_pct) {
            errors.push(InputError::new(
                "parameters.safety_margin_pct",
                format!(
                    "must be in [0, {MAX_SAFETY_MARGIN_PCT}], got {}; clamped to {}",
                    self.safety_margin_pct,
                    self.margin_fraction() * 100.0
                ),
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let p = CalculationParameters::default();
        assert!(p.validate().is_empty());
        assert_eq!(p.margin_fraction(), 0.1);
    }

    #[test]
    fn inverted_temperatures_are_reported() {
        let p = CalculationParameters {
            min_temp_c: 40.0,
            max_temp_c: 40.0,
            safety_margin_pct: 0.0,
        };
        let errors = p.validate();
        assert!(errors.iter().any(|e| e.field == "parameters.min_temp_c"));
        assert!(!p.has_valid_temperatures());
    }

    #[test]
    fn margin_out_of_range_is_reported_and_clamped() {
        let p = CalculationParameters {
            safety_margin_pct: 75.0,
            ..CalculationParameters::default()
        };
        assert!(
            p.validate()
                .iter()
                .any(|e| e.field == "parameters.safety_margin_pct")
        );
        assert_eq!(p.margin_fraction(), 0.5);

        let negative = CalculationParameters {
            safety_margin_pct: -5.0,
            ..CalculationParameters::default()
        };
        assert_eq!(negative.margin_fraction(), 0.0);
    }

    #[test]
    fn nan_temperature_is_reported() {
        let p = CalculationParameters {
            min_temp_c: f64::NAN,
            ..CalculationParameters::default()
        };
        assert!(!p.has_valid_temperatures());
        assert_eq!(p.validate().len(), 1);
    }

    #[test]
    fn builder_sets_topology() {
        let cfg = StringConfiguration::new(2, None)
            .with_topology(14, 3)
            .enabled(false);
        assert_eq!(cfg.tracker, 2);
        assert_eq!(cfg.modules_per_string, 14);
        assert_eq!(cfg.parallel_strings, 3);
        assert!(!cfg.enabled);
    }
}
