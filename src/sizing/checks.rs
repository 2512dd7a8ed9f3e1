//! Per-tracker electrical limit checks.
//!
//! Each check compares one string/array value against one effective limit at
//! the physically worst temperature for that limit:
//!
//! | Check | Worst case | Condition |
//! |---|---|---|
//! | Max DC voltage | cold | `n * Voc(Tmin) <= Vdc_max` |
//! | MPPT lower bound | hot | `n * Vmpp(Tmax) >= Vmppt_min` |
//! | MPPT upper bound | cold | `n * Vmpp(Tmin) <= Vmppt_max` |
//! | Start voltage | hot | `n * Vmpp(Tmax) >= V_start` |
//! | Short-circuit current | hot | `s * Isc(Tmax) <= Isc_max` |
//! | Input current | hot | `s * Impp(Tmax) <= Iin_max` |
//! | DC power | cold | `s * n * Pmax(Tmin) <= Pdc_tracker` |
//! | String cap | - | `s <= cap` |

use std::fmt;

use super::bounds::{exceeds, falls_short, max_count, min_count};
use super::limits::EffectiveLimits;
use super::thermal::{StringElectricals, ThermalProfile};

/// The limit a check guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    MaxDcVoltage,
    MpptMinVoltage,
    MpptMaxVoltage,
    StartVoltage,
    ShortCircuitCurrent,
    InputCurrent,
    DcPower,
    StringCap,
}

impl Check {
    /// Every check, in evaluation order.
    pub const ALL: [Check; 8] = [
        Check::MaxDcVoltage,
        Check::MpptMinVoltage,
        Check::MpptMaxVoltage,
        Check::StartVoltage,
        Check::ShortCircuitCurrent,
        Check::InputCurrent,
        Check::StringCap,
        Check::DcPower,
    ];

    /// Short identifier used in exports and logs.
    pub fn key(self) -> &'static str {
        match self {
            Check::MaxDcVoltage => "max_dc_voltage",
            Check::MpptMinVoltage => "mppt_min_voltage",
            Check::MpptMaxVoltage => "mppt_max_voltage",
            Check::StartVoltage => "start_voltage",
            Check::ShortCircuitCurrent => "short_circuit_current",
            Check::InputCurrent => "input_current",
            Check::DcPower => "dc_power",
            Check::StringCap => "string_cap",
        }
    }

    fn headline(self) -> &'static str {
        match self {
            Check::MaxDcVoltage => "max DC voltage exceeded",
            Check::MpptMinVoltage => "below MPPT lower bound when hot",
            Check::MpptMaxVoltage => "above MPPT upper bound when cold",
            Check::StartVoltage => "start voltage not reached",
            Check::ShortCircuitCurrent => "short-circuit current limit exceeded",
            Check::InputCurrent => "input current limit exceeded",
            Check::DcPower => "DC power limit exceeded",
            Check::StringCap => "manufacturer string limit exceeded",
        }
    }

    fn expression(self) -> &'static str {
        match self {
            Check::MaxDcVoltage => "N*Voc(Tmin)",
            Check::MpptMinVoltage | Check::StartVoltage => "N*Vmpp(Tmax)",
            Check::MpptMaxVoltage => "N*Vmpp(Tmin)",
            Check::ShortCircuitCurrent => "S*Isc(Tmax)",
            Check::InputCurrent => "S*Impp(Tmax)",
            Check::DcPower => "S*N*Pmax(Tmin)",
            Check::StringCap => "S",
        }
    }

    /// `true` for floors (value must reach the limit), `false` for ceilings.
    fn is_floor(self) -> bool {
        matches!(self, Check::MpptMinVoltage | Check::StartVoltage)
    }

    fn format_value(self, v: f64) -> String {
        match self {
            Check::MaxDcVoltage
            | Check::MpptMinVoltage
            | Check::MpptMaxVoltage
            | Check::StartVoltage => format!("{v:.1} V"),
            Check::ShortCircuitCurrent | Check::InputCurrent => format!("{v:.2} A"),
            Check::DcPower => format!("{v:.0} W"),
            Check::StringCap => format!("{v:.0}"),
        }
    }
}

/// Topology change that resolves a violated check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    MaxModulesPerString(u32),
    MinModulesPerString(u32),
    MaxParallelStrings(u32),
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correction::MaxModulesPerString(n) => write!(f, "max modules per string: {n}"),
            Correction::MinModulesPerString(n) => write!(f, "min modules per string: {n}"),
            Correction::MaxParallelStrings(0) => write!(f, "no parallel strings permitted"),
            Correction::MaxParallelStrings(s) => write!(f, "max parallel strings: {s}"),
        }
    }
}

/// A failed check with the measured value, the effective limit, and the fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Violation {
    pub check: Check,
    /// Computed string or array value.
    pub measured: f64,
    /// Effective (margin-adjusted) limit.
    pub limit: f64,
    pub correction: Correction,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cmp = if self.check.is_floor() { "<" } else { ">" };
        write!(
            f,
            "{}: {} = {} {cmp} {}; {}",
            self.check.headline(),
            self.check.expression(),
            self.check.format_value(self.measured),
            self.check.format_value(self.limit),
            self.correction
        )
    }
}

/// Runs every check for one tracker topology.
///
/// # Arguments
///
/// * `profile` - Per-module values at `Tmin`/`Tmax`
/// * `electricals` - String and array values for the configured topology
/// * `limits` - Margin-adjusted inverter limits
/// * `string_cap` - Manufacturer cap on parallel strings, if specified
///
/// # Returns
///
/// One [`Violation`] per failed check, in [`Check::ALL`] order. An empty
/// vector means the tracker passes.
pub fn run_checks(
    profile: &ThermalProfile,
    electricals: &StringElectricals,
    limits: &EffectiveLimits,
    string_cap: Option<u32>,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let e = electricals;

    let voc_cold = e.string_voc_v.at_tmin;
    if exceeds(voc_cold, limits.max_dc_voltage_v) {
        violations.push(Violation {
            check: Check::MaxDcVoltage,
            measured: voc_cold,
            limit: limits.max_dc_voltage_v,
            correction: Correction::MaxModulesPerString(max_count(
                limits.max_dc_voltage_v,
                profile.voc_v.at_tmin,
            )),
        });
    }

    let vmpp_hot = e.string_vmpp_v.at_tmax;
    if falls_short(vmpp_hot, limits.mppt_min_v) {
        violations.push(Violation {
            check: Check::MpptMinVoltage,
            measured: vmpp_hot,
            limit: limits.mppt_min_v,
            correction: Correction::MinModulesPerString(
                min_count(limits.mppt_min_v, profile.vmpp_v.at_tmax).max(1),
            ),
        });
    }

    let vmpp_cold = e.string_vmpp_v.at_tmin;
    if exceeds(vmpp_cold, limits.mppt_max_v) {
        violations.push(Violation {
            check: Check::MpptMaxVoltage,
            measured: vmpp_cold,
            limit: limits.mppt_max_v,
            correction: Correction::MaxModulesPerString(max_count(
                limits.mppt_max_v,
                profile.vmpp_v.at_tmin,
            )),
        });
    }

    if falls_short(vmpp_hot, limits.start_voltage_v) {
        violations.push(Violation {
            check: Check::StartVoltage,
            measured: vmpp_hot,
            limit: limits.start_voltage_v,
            correction: Correction::MinModulesPerString(
                min_count(limits.start_voltage_v, profile.vmpp_v.at_tmax).max(1),
            ),
        });
    }

    let isc_hot = e.array_isc_a.at_tmax;
    if exceeds(isc_hot, limits.max_short_circuit_current_a) {
        violations.push(Violation {
            check: Check::ShortCircuitCurrent,
            measured: isc_hot,
            limit: limits.max_short_circuit_current_a,
            correction: Correction::MaxParallelStrings(max_count(
                limits.max_short_circuit_current_a,
                profile.isc_a.at_tmax,
            )),
        });
    }

    let impp_hot = e.array_impp_a.at_tmax;
    if exceeds(impp_hot, limits.max_input_current_a) {
        violations.push(Violation {
            check: Check::InputCurrent,
            measured: impp_hot,
            limit: limits.max_input_current_a,
            correction: Correction::MaxParallelStrings(max_count(
                limits.max_input_current_a,
                profile.impp_a.at_tmax,
            )),
        });
    }

    if let Some(cap) = string_cap {
        if e.parallel_strings > cap {
            violations.push(Violation {
                check: Check::StringCap,
                measured: f64::from(e.parallel_strings),
                limit: f64::from(cap),
                correction: Correction::MaxParallelStrings(cap),
            });
        }
    }

    let power_cold = e.array_power_w.at_tmin;
    if exceeds(power_cold, limits.max_dc_power_per_tracker_w) {
        let string_power_w = f64::from(e.modules_per_string) * profile.pmax_w.at_tmin;
        violations.push(Violation {
            check: Check::DcPower,
            measured: power_cold,
            limit: limits.max_dc_power_per_tracker_w,
            correction: Correction::MaxParallelStrings(max_count(
                limits.max_dc_power_per_tracker_w,
                string_power_w,
            )),
        });
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::thermal::TempPair;

    fn profile() -> ThermalProfile {
        ThermalProfile {
            voc_v: TempPair::new(50.0, 42.0),
            vmpp_v: TempPair::new(41.0, 34.0),
            pmax_w: TempPair::new(450.0, 380.0),
            isc_a: TempPair::new(11.0, 11.5),
            impp_a: TempPair::new(10.5, 11.0),
        }
    }

    fn limits() -> EffectiveLimits {
        EffectiveLimits {
            margin: 0.0,
            max_dc_voltage_v: 600.0,
            start_voltage_v: 150.0,
            mppt_min_v: 200.0,
            mppt_max_v: 480.0,
            max_input_current_a: 25.0,
            max_short_circuit_current_a: 30.0,
            max_dc_power_per_tracker_w: 10_000.0,
        }
    }

    fn run(n: u32, s: u32, cap: Option<u32>) -> Vec<Violation> {
        let p = profile();
        run_checks(&p, &StringElectricals::new(&p, n, s), &limits(), cap)
    }

    fn checks(v: &[Violation]) -> Vec<Check> {
        v.iter().map(|v| v.check).collect()
    }

    #[test]
    fn compliant_topology_has_no_violations() {
        assert!(run(10, 2, None).is_empty());
    }

    #[test]
    fn too_many_modules_violates_cold_voltage_checks() {
        let v = run(13, 1, None);
        assert_eq!(
            checks(&v),
            vec![Check::MaxDcVoltage, Check::MpptMaxVoltage]
        );
        assert_eq!(v[0].correction, Correction::MaxModulesPerString(12));
        assert_eq!(v[1].correction, Correction::MaxModulesPerString(11));
    }

    #[test]
    fn too_few_modules_violates_hot_voltage_checks() {
        let v = run(4, 1, None);
        assert_eq!(
            checks(&v),
            vec![Check::MpptMinVoltage, Check::StartVoltage]
        );
        assert_eq!(v[0].correction, Correction::MinModulesPerString(6));
        assert_eq!(v[1].correction, Correction::MinModulesPerString(5));
    }

    #[test]
    fn too_many_strings_violates_current_and_power_checks() {
        let v = run(10, 3, Some(2));
        assert_eq!(
            checks(&v),
            vec![
                Check::ShortCircuitCurrent,
                Check::InputCurrent,
                Check::StringCap,
                Check::DcPower
            ]
        );
        assert!(
            v.iter()
                .all(|v| v.correction == Correction::MaxParallelStrings(2))
        );
    }

    #[test]
    fn violations_follow_evaluation_order() {
        let p = profile();
        let l = EffectiveLimits {
            mppt_min_v: 460.0,
            start_voltage_v: 450.0,
            ..limits()
        };
        // 13 modules and 3 strings break every limit at once
        let v = run_checks(&p, &StringElectricals::new(&p, 13, 3), &l, Some(2));
        assert_eq!(checks(&v), Check::ALL.to_vec());
    }

    #[test]
    fn boundary_value_passes() {
        // 12 * 50 V = 600 V exactly at the limit
        let v = run(12, 1, None);
        assert!(!checks(&v).contains(&Check::MaxDcVoltage));
    }

    #[test]
    fn message_names_value_limit_and_fix() {
        let v = run(13, 1, None);
        assert_eq!(
            v[0].to_string(),
            "max DC voltage exceeded: N*Voc(Tmin) = 650.0 V > 600.0 V; max modules per string: 12"
        );
        let v = run(4, 1, None);
        assert_eq!(
            v[1].to_string(),
            "start voltage not reached: N*Vmpp(Tmax) = 136.0 V < 150.0 V; min modules per string: 5"
        );
    }

    #[test]
    fn zero_string_correction_reads_as_none_permitted() {
        assert_eq!(
            Correction::MaxParallelStrings(0).to_string(),
            "no parallel strings permitted"
        );
    }
}
