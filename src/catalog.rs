//! Catalog of module and inverter datasheet records.
//!
//! Catalog files are JSON documents keyed by the German datasheet labels of
//! the shipped data files. A module file holds `{"Module": [...]}`, an inverter
//! file holds `{"Wechselrichter": [...]}`, and a combined file may carry both
//! keys.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::equipment::{Inverter, ProductRef, PvModule};

/// Errors raised while reading catalog files.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk layout shared by module, inverter and combined files.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CatalogFile {
    #[serde(rename = "Module")]
    modules: Vec<PvModule>,
    #[serde(rename = "Wechselrichter")]
    inverters: Vec<Inverter>,
}

/// Immutable module and inverter lists with lookup by manufacturer and model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub modules: Vec<PvModule>,
    pub inverters: Vec<Inverter>,
}

impl Catalog {
    /// Parses a module document and an inverter document.
    ///
    /// # Errors
    ///
    /// Returns the JSON error of the first document that fails to parse.
    pub fn from_json_strs(modules_json: &str, inverters_json: &str) -> serde_json::Result<Self> {
        let modules: CatalogFile = serde_json::from_str(modules_json)?;
        let inverters: CatalogFile = serde_json::from_str(inverters_json)?;
        Ok(Self {
            modules: modules.modules,
            inverters: inverters.inverters,
        })
    }

    /// Loads separate module and inverter files.
    ///
    /// A missing file is logged and contributes an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if an existing file cannot be read or parsed.
    pub fn from_json_files(
        modules_path: impl AsRef<Path>,
        inverters_path: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let modules = read_optional(modules_path.as_ref(), "PV modules")?.modules;
        let inverters = read_optional(inverters_path.as_ref(), "inverters")?.inverters;

        let catalog = Self { modules, inverters };
        catalog.log_loaded();
        Ok(catalog)
    }

    /// Loads a combined file carrying both `Module` and `Wechselrichter`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = read_file(path.as_ref())?;
        let catalog = Self {
            modules: file.modules,
            inverters: file.inverters,
        };
        catalog.log_loaded();
        Ok(catalog)
    }

    /// Serializes the catalog as a combined JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&CatalogFile {
            modules: self.modules.clone(),
            inverters: self.inverters.clone(),
        })
    }

    pub fn find_module(&self, reference: &ProductRef) -> Option<&PvModule> {
        self.modules
            .iter()
            .find(|m| reference.matches(&m.manufacturer, &m.model))
    }

    pub fn find_inverter(&self, reference: &ProductRef) -> Option<&Inverter> {
        self.inverters
            .iter()
            .find(|i| reference.matches(&i.manufacturer, &i.model))
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.inverters.is_empty()
    }

    fn log_loaded(&self) {
        info!(
            modules = self.modules.len(),
            inverters = self.inverters.len(),
            "catalog loaded"
        );
    }

    /// Small demo catalog used by the scenario presets.
    pub fn builtin() -> Self {
        Self {
            modules: vec![
                module("SunWorks", "SW-410", [410.0, 37.5, 10.93, 45.0, 11.6, 21.0], [-0.35, -0.29, 0.05]),
                module("Nordlicht", "NL-375 M", [375.0, 34.2, 10.97, 41.1, 11.62, 20.4], [-0.36, -0.28, 0.048]),
                module("Heliona", "HX-550 Bifacial", [550.0, 41.9, 13.13, 49.8, 13.98, 21.3], [-0.34, -0.27, 0.045]),
            ],
            inverters: vec![
                Inverter {
                    manufacturer: "Voltra".to_string(),
                    model: "V6K".to_string(),
                    max_dc_power_w: 9_000.0,
                    max_dc_voltage_v: 600.0,
                    start_voltage_v: 120.0,
                    mppt_voltage_range: "150-550".to_string(),
                    nominal_dc_voltage_v: 360.0,
                    max_input_current_a: 16.0,
                    max_short_circuit_current_a: 22.0,
                    tracker_count: 2,
                    max_strings_per_mppt: 2,
                },
                Inverter {
                    manufacturer: "Voltra".to_string(),
                    model: "V10K".to_string(),
                    max_dc_power_w: 15_000.0,
                    max_dc_voltage_v: 1_000.0,
                    start_voltage_v: 180.0,
                    mppt_voltage_range: "200-850".to_string(),
                    nominal_dc_voltage_v: 600.0,
                    max_input_current_a: 26.0,
                    max_short_circuit_current_a: 32.0,
                    tracker_count: 2,
                    max_strings_per_mppt: 0,
                },
                Inverter {
                    manufacturer: "Kestrel".to_string(),
                    model: "KS-5.0".to_string(),
                    max_dc_power_w: 7_500.0,
                    max_dc_voltage_v: 600.0,
                    start_voltage_v: 100.0,
                    mppt_voltage_range: "90-520".to_string(),
                    nominal_dc_voltage_v: 360.0,
                    max_input_current_a: 13.5,
                    max_short_circuit_current_a: 17.0,
                    tracker_count: 2,
                    max_strings_per_mppt: 1,
                },
            ],
        }
    }
}

/// `ratings` = Pmax, Vmpp, Impp, Voc, Isc, efficiency; `coeffs` = Pmax, Voc, Isc.
fn module(manufacturer: &str, model: &str, ratings: [f64; 6], coeffs: [f64; 3]) -> PvModule {
    let [pmax_w, vmpp_v, impp_a, voc_v, isc_a, efficiency_pct] = ratings;
    let [temp_coeff_pmax_pct, temp_coeff_voc_pct, temp_coeff_isc_pct] = coeffs;
    PvModule {
        manufacturer: manufacturer.to_string(),
        model: model.to_string(),
        pmax_w,
        vmpp_v,
        impp_a,
        voc_v,
        isc_a,
        efficiency_pct,
        temp_coeff_pmax_pct,
        temp_coeff_voc_pct,
        temp_coeff_isc_pct,
    }
}

fn read_file(path: &Path) -> Result<CatalogFile, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional(path: &Path, what: &str) -> Result<CatalogFile, CatalogError> {
    if !path.exists() {
        warn!(path = %path.display(), "{what} file not found; loading none");
        return Ok(CatalogFile::default());
    }
    read_file(path)
}
