use serde::{Deserialize, Serialize};

use super::ProductRef;

/// Reference temperature of datasheet (STC) ratings in °C.
pub const STC_TEMPERATURE_C: f64 = 25.0;

/// Lower bound on the MPP voltage used when deriving the MPP current.
const MIN_VMPP_FOR_CURRENT_V: f64 = 0.1;

/// A PV module datasheet record.
///
/// All electrical values are rated at STC (25 °C). Temperature coefficients
/// are in %/°C relative to the STC value and may be positive or negative.
///
/// Field names on the wire follow the catalog data files, which carry the
/// German datasheet labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PvModule {
    #[serde(rename = "Hersteller")]
    pub manufacturer: String,
    #[serde(rename = "Model")]
    pub model: String,
    /// Nominal power at STC (Wp).
    #[serde(rename = "Nominalleistung-PMAX (Wp)")]
    pub pmax_w: f64,
    /// Voltage at the maximum power point (V).
    #[serde(rename = "Spannung im MPP-UMPP (V)")]
    pub vmpp_v: f64,
    /// Current at the maximum power point (A).
    #[serde(rename = "Strom im MPP-IMPP (A)")]
    pub impp_a: f64,
    /// Open-circuit voltage (V).
    #[serde(rename = "Leerlaufspannung-UOC (V)")]
    pub voc_v: f64,
    /// Short-circuit current (A).
    #[serde(rename = "Kurzschlusstrom-ISC (A)")]
    pub isc_a: f64,
    /// Module efficiency (%). Informational only.
    #[serde(rename = "Modulwirkungsgrad η m (%)", default)]
    pub efficiency_pct: f64,
    /// Temperature coefficient of Pmax (%/°C).
    #[serde(rename = "Temperaturkoeffzient von PMAX (%/°C)")]
    pub temp_coeff_pmax_pct: f64,
    /// Temperature coefficient of Voc (%/°C).
    #[serde(rename = "Temperaturkoeffzient von VOC (%/°C)")]
    pub temp_coeff_voc_pct: f64,
    /// Temperature coefficient of Isc (%/°C).
    #[serde(rename = "Temperaturkoeffzient von ISC (%/°C)")]
    pub temp_coeff_isc_pct: f64,
}

/// Scales an STC-rated value to temperature `temp_c` with a linear coefficient.
///
/// `x(T) = x25 * (1 + coeff/100 * (T - 25))`
///
/// # Examples
///
/// ```
/// use pv_sizer::equipment::module::apply_temp_coeff;
///
/// assert_eq!(apply_temp_coeff(40.0, -0.3, 25.0), 40.0);
/// assert!((apply_temp_coeff(100.0, -0.5, 35.0) - 95.0).abs() < 1e-12);
/// ```
pub fn apply_temp_coeff(value_at_stc: f64, coeff_pct_per_c: f64, temp_c: f64) -> f64 {
    value_at_stc * (1.0 + (coeff_pct_per_c / 100.0) * (temp_c - STC_TEMPERATURE_C))
}

impl PvModule {
    /// Open-circuit voltage at `temp_c` (V).
    pub fn voc_at(&self, temp_c: f64) -> f64 {
        apply_temp_coeff(self.voc_v, self.temp_coeff_voc_pct, temp_c)
    }

    /// MPP voltage at `temp_c` (V).
    ///
    /// Datasheets rarely give a Vmpp coefficient, so the Voc coefficient is
    /// used as an approximation.
    pub fn vmpp_at(&self, temp_c: f64) -> f64 {
        apply_temp_coeff(self.vmpp_v, self.temp_coeff_voc_pct, temp_c)
    }

    /// Maximum power at `temp_c` (W).
    pub fn pmax_at(&self, temp_c: f64) -> f64 {
        apply_temp_coeff(self.pmax_w, self.temp_coeff_pmax_pct, temp_c)
    }

    /// Short-circuit current at `temp_c` (A).
    pub fn isc_at(&self, temp_c: f64) -> f64 {
        apply_temp_coeff(self.isc_a, self.temp_coeff_isc_pct, temp_c)
    }

    /// MPP current at `temp_c` (A), derived as `Pmax(T) / max(Vmpp(T), 0.1)`.
    pub fn impp_at(&self, temp_c: f64) -> f64 {
        self.pmax_at(temp_c) / self.vmpp_at(temp_c).max(MIN_VMPP_FOR_CURRENT_V)
    }

    /// Catalog reference for this record.
    pub fn reference(&self) -> ProductRef {
        ProductRef::new(self.manufacturer.clone(), self.model.clone())
    }

    /// Human-readable label, e.g. `"SunWorks SW-410 (410 Wp)"`.
    pub fn display_name(&self) -> String {
        format!("{} {} ({} Wp)", self.manufacturer, self.model, self.pmax_w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn module() -> PvModule {
        PvModule {
            manufacturer: "SunWorks".to_string(),
            model: "SW-410".to_string(),
            pmax_w: 410.0,
            vmpp_v: 37.5,
            impp_a: 10.93,
            voc_v: 45.0,
            isc_a: 11.6,
            efficiency_pct: 21.0,
            temp_coeff_pmax_pct: -0.35,
            temp_coeff_voc_pct: -0.29,
            temp_coeff_isc_pct: 0.05,
        }
    }

    #[test]
    fn values_at_stc_are_unchanged() {
        let m = module();
        assert_relative_eq!(m.voc_at(25.0), 45.0);
        assert_relative_eq!(m.vmpp_at(25.0), 37.5);
        assert_relative_eq!(m.pmax_at(25.0), 410.0);
        assert_relative_eq!(m.isc_at(25.0), 11.6);
    }

    #[test]
    fn cold_voc_rises_with_negative_coefficient() {
        // 45 * (1 + (-0.29/100) * (-20 - 25)) = 50.8725
        assert_relative_eq!(module().voc_at(-20.0), 50.8725, epsilon = 1e-9);
    }

    #[test]
    fn vmpp_follows_voc_coefficient() {
        let m = module();
        let ratio_voc = m.voc_at(60.0) / m.voc_v;
        let ratio_vmpp = m.vmpp_at(60.0) / m.vmpp_v;
        assert_relative_eq!(ratio_voc, ratio_vmpp, epsilon = 1e-12);
    }

    #[test]
    fn isc_rises_when_hot_with_positive_coefficient() {
        let m = module();
        assert!(m.isc_at(70.0) > m.isc_a);
        assert!(m.isc_at(-10.0) < m.isc_a);
    }

    #[test]
    fn impp_is_power_over_vmpp() {
        let m = module();
        assert_relative_eq!(m.impp_at(40.0), m.pmax_at(40.0) / m.vmpp_at(40.0));
    }

    #[test]
    fn impp_floors_tiny_vmpp() {
        let mut m = module();
        m.vmpp_v = 0.0;
        assert_relative_eq!(m.impp_at(25.0), 410.0 / 0.1);
    }

    #[test]
    fn display_name_includes_power() {
        assert_eq!(module().display_name(), "SunWorks SW-410 (410 Wp)");
    }

    #[test]
    fn deserializes_catalog_labels() {
        let json = r#"{
            "Hersteller": "SunWorks",
            "Model": "SW-410",
            "Nominalleistung-PMAX (Wp)": 410,
            "Spannung im MPP-UMPP (V)": 37.5,
            "Strom im MPP-IMPP (A)": 10.93,
            "Leerlaufspannung-UOC (V)": 45.0,
            "Kurzschlusstrom-ISC (A)": 11.6,
            "Modulwirkungsgrad η m (%)": 21.0,
            "Temperaturkoeffzient von PMAX (%/°C)": -0.35,
            "Temperaturkoeffzient von VOC (%/°C)": -0.29,
            "Temperaturkoeffzient von ISC (%/°C)": 0.05
        }"#;
        let parsed: PvModule = serde_json::from_str(json).expect("module should parse");
        assert_eq!(parsed, module());
    }
}
