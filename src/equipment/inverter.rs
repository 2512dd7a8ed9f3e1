use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ProductRef;

/// An inverter datasheet record.
///
/// The MPPT operating range is kept as the datasheet text (e.g. `"160-650"`)
/// and parsed with [`MpptRange::parse`] when limits are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inverter {
    #[serde(rename = "Hersteller")]
    pub manufacturer: String,
    #[serde(rename = "Model")]
    pub model: String,
    /// Maximum DC input power across all trackers (W).
    #[serde(rename = "Max.DC-Eingangsleistung (W)")]
    pub max_dc_power_w: f64,
    /// Maximum DC input voltage (V).
    #[serde(rename = "Max.DC-Eingangsspannung (V)")]
    pub max_dc_voltage_v: f64,
    /// Start voltage (V).
    #[serde(rename = "Startspannung (V)")]
    pub start_voltage_v: f64,
    /// MPPT operating voltage range as datasheet text, e.g. `"160-650"`.
    #[serde(rename = "MPPT-Spannungsbereich (V)")]
    pub mppt_voltage_range: String,
    /// Nominal DC input voltage (V). Informational only.
    #[serde(rename = "Nenn-DC-Eingangsspannung (V)", default)]
    pub nominal_dc_voltage_v: f64,
    /// Maximum continuous input current per tracker (A).
    #[serde(rename = "Max. Betriebs-PV-Eingangsstrom (A)")]
    pub max_input_current_a: f64,
    /// Maximum input short-circuit current per tracker (A).
    #[serde(rename = "Max. Eingangs-Kurzschlussstrom (A)")]
    pub max_short_circuit_current_a: f64,
    /// Number of independent MPPT trackers.
    #[serde(rename = "Anzahl der MPP Trackers")]
    pub tracker_count: u32,
    /// Manufacturer cap on parallel strings per tracker; 0 means unspecified.
    #[serde(rename = "Max. Strings pro MPPT", default)]
    pub max_strings_per_mppt: u32,
}

impl Inverter {
    /// Catalog reference for this record.
    pub fn reference(&self) -> ProductRef {
        ProductRef::new(self.manufacturer.clone(), self.model.clone())
    }

    /// Human-readable label, e.g. `"Voltra V8K (MPPT 160-650 V)"`.
    pub fn display_name(&self) -> String {
        format!(
            "{} {} (MPPT {} V)",
            self.manufacturer, self.model, self.mppt_voltage_range
        )
    }

    /// Manufacturer string cap, or `None` when unspecified.
    pub fn string_cap(&self) -> Option<u32> {
        (self.max_strings_per_mppt > 0).then_some(self.max_strings_per_mppt)
    }
}

/// Why an MPPT range text could not be parsed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeParseError {
    #[error("MPPT range is empty")]
    Empty,
    #[error("MPPT range \"{text}\" must have the form \"min-max\"")]
    Shape { text: String },
    #[error("MPPT range \"{text}\" contains a non-numeric bound")]
    Number { text: String },
    #[error("MPPT range {min}-{max} must satisfy 0 < min < max")]
    Bounds { min: f64, max: f64 },
}

/// A closed MPPT operating voltage interval `[min_v, max_v]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MpptRange {
    pub min_v: f64,
    pub max_v: f64,
}

impl MpptRange {
    /// Parses datasheet text such as `"160-650"`, `"200 – 800"` or `"90—520"`.
    ///
    /// Spaces are ignored and the bounds use a decimal point.
    ///
    /// # Errors
    ///
    /// Returns a [`RangeParseError`] unless the text holds exactly two numbers
    /// with `0 < min < max`.
    pub fn parse(text: &str) -> Result<Self, RangeParseError> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(RangeParseError::Empty);
        }

        let parts: Vec<&str> = compact.split(['-', '–', '—']).collect();
        let [lo, hi] = parts.as_slice() else {
            return Err(RangeParseError::Shape {
                text: text.to_string(),
            });
        };

        let number = |s: &str| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| RangeParseError::Number {
                    text: text.to_string(),
                })
        };
        let min_v = number(*lo)?;
        let max_v = number(*hi)?;

        if min_v <= 0.0 || max_v <= min_v {
            return Err(RangeParseError::Bounds {
                min: min_v,
                max: max_v,
            });
        }
        Ok(Self { min_v, max_v })
    }
}
