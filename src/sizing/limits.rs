//! Inverter limits derated by the safety margin.

use std::fmt;

use crate::equipment::{Inverter, MpptRange};

/// Inverter limits after applying the safety margin.
///
/// Every limit moves in its conservative direction: ceilings shrink by
/// `(1 - m)` and floors grow by `(1 + m)`. The direction is fixed per limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveLimits {
    /// Margin fraction that produced these limits (0.0 to 0.5).
    pub margin: f64,
    /// Maximum DC input voltage (V), derated down.
    pub max_dc_voltage_v: f64,
    /// Start voltage (V), raised.
    pub start_voltage_v: f64,
    /// MPPT lower bound (V), raised.
    pub mppt_min_v: f64,
    /// MPPT upper bound (V), derated down.
    pub mppt_max_v: f64,
    /// Continuous input current per tracker (A), derated down.
    pub max_input_current_a: f64,
    /// Short-circuit current per tracker (A), derated down.
    pub max_short_circuit_current_a: f64,
    /// DC power per tracker (W), total power split evenly, derated down.
    pub max_dc_power_per_tracker_w: f64,
}

impl EffectiveLimits {
    /// Derives effective limits for `inverter`.
    ///
    /// # Arguments
    ///
    /// * `inverter` - Datasheet record
    /// * `mppt` - Parsed MPPT range of the same inverter
    /// * `margin` - Safety margin as a fraction (0.1 for 10 %)
    ///
    /// A tracker count of 0 is treated as 1 for the power split.
    pub fn derive(inverter: &Inverter, mppt: MpptRange, margin: f64) -> Self {
        let derate = 1.0 - margin;
        let raise = 1.0 + margin;
        let trackers = f64::from(inverter.tracker_count.max(1));

        Self {
            margin,
            max_dc_voltage_v: inverter.max_dc_voltage_v * derate,
            start_voltage_v: inverter.start_voltage_v * raise,
            mppt_min_v: mppt.min_v * raise,
            mppt_max_v: mppt.max_v * derate,
            max_input_current_a: inverter.max_input_current_a * derate,
            max_short_circuit_current_a: inverter.max_short_circuit_current_a * derate,
            max_dc_power_per_tracker_w: inverter.max_dc_power_w / trackers * derate,
        }
    }
}

impl fmt::Display for EffectiveLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vdc_max={:.1} V, MPPT={:.1}-{:.1} V, Start={:.1} V, I_in_max={:.2} A, I_sc_max={:.2} A, Pdc_MPPT={:.0} W",
            self.max_dc_voltage_v,
            self.mppt_min_v,
            self.mppt_max_v,
            self.start_voltage_v,
            self.max_input_current_a,
            self.max_short_circuit_current_a,
            self.max_dc_power_per_tracker_w
        )
    }
}
