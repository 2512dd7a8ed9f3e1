//! Temperature-compensated module values and their series/parallel aggregation.

use crate::equipment::{CalculationParameters, PvModule};

/// A quantity evaluated at both ends of the temperature range.
///
/// Coefficients may have either sign, so neither end is assumed to be the
/// larger one; use [`TempPair::min`] and [`TempPair::max`] for extremes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempPair {
    /// Value at the minimum temperature (cold case).
    pub at_tmin: f64,
    /// Value at the maximum temperature (hot case).
    pub at_tmax: f64,
}

impl TempPair {
    pub fn new(at_tmin: f64, at_tmax: f64) -> Self {
        Self { at_tmin, at_tmax }
    }

    pub fn min(&self) -> f64 {
        self.at_tmin.min(self.at_tmax)
    }

    pub fn max(&self) -> f64 {
        self.at_tmin.max(self.at_tmax)
    }

    /// Multiplies both ends by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.at_tmin * factor, self.at_tmax * factor)
    }
}

/// Per-module electrical values at `Tmin` and `Tmax`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalProfile {
    pub voc_v: TempPair,
    /// MPP voltage, compensated with the Voc coefficient.
    pub vmpp_v: TempPair,
    pub pmax_w: TempPair,
    pub isc_a: TempPair,
    /// Derived MPP current, `Pmax(T) / max(Vmpp(T), 0.1)`.
    pub impp_a: TempPair,
}

impl ThermalProfile {
    /// Evaluates `module` at the parameter temperature extremes.
    pub fn new(module: &PvModule, params: &CalculationParameters) -> Self {
        let (t_min, t_max) = (params.min_temp_c, params.max_temp_c);

        Self {
            voc_v: TempPair::new(module.voc_at(t_min), module.voc_at(t_max)),
            vmpp_v: TempPair::new(module.vmpp_at(t_min), module.vmpp_at(t_max)),
            pmax_w: TempPair::new(module.pmax_at(t_min), module.pmax_at(t_max)),
            isc_a: TempPair::new(module.isc_at(t_min), module.isc_at(t_max)),
            impp_a: TempPair::new(module.impp_at(t_min), module.impp_at(t_max)),
        }
    }

    /// Names of the quantities that are not strictly positive (or not finite)
    /// at either temperature.
    ///
    /// The checks divide by these values, so a non-empty result means the
    /// module cannot be evaluated over this range.
    pub fn non_positive_quantities(&self) -> Vec<&'static str> {
        [
            ("Voc", self.voc_v),
            ("Vmpp", self.vmpp_v),
            ("Pmax", self.pmax_w),
            ("Isc", self.isc_a),
        ]
        .into_iter()
        .filter(|(_, p)| !(p.at_tmin.is_finite() && p.at_tmax.is_finite() && p.min() > 0.0))
        .map(|(name, _)| name)
        .collect()
    }
}

/// String and array values for one tracker topology.
///
/// Series wiring multiplies voltages by the modules per string; parallel
/// wiring multiplies currents by the string count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringElectricals {
    pub modules_per_string: u32,
    pub parallel_strings: u32,
    /// Open-circuit voltage of one string (V).
    pub string_voc_v: TempPair,
    /// MPP voltage of one string (V).
    pub string_vmpp_v: TempPair,
    /// Short-circuit current of one string (A).
    pub string_isc_a: TempPair,
    /// MPP current of one string (A).
    pub string_impp_a: TempPair,
    /// Short-circuit current of all parallel strings (A).
    pub array_isc_a: TempPair,
    /// MPP current of all parallel strings (A).
    pub array_impp_a: TempPair,
    /// Maximum power of all parallel strings (W).
    pub array_power_w: TempPair,
}

impl StringElectricals {
    pub fn new(profile: &ThermalProfile, modules_per_string: u32, parallel_strings: u32) -> Self {
        let n = f64::from(modules_per_string);
        let s = f64::from(parallel_strings);

        Self {
            modules_per_string,
            parallel_strings,
            string_voc_v: profile.voc_v.scaled(n),
            string_vmpp_v: profile.vmpp_v.scaled(n),
            string_isc_a: profile.isc_a,
            string_impp_a: profile.impp_a,
            array_isc_a: profile.isc_a.scaled(s),
            array_impp_a: profile.impp_a.scaled(s),
            array_power_w: profile.pmax_w.scaled(n * s),
        }
    }
}
