//! Feasible series and parallel counts derived by inverting the limit checks.

use std::fmt;
use std::ops::RangeInclusive;

use super::limits::EffectiveLimits;
use super::thermal::ThermalProfile;

/// Absolute tolerance for limit comparisons at exact boundary values.
pub const TOLERANCE: f64 = 1e-6;

/// Returns `true` if `value` is above the ceiling `limit` beyond tolerance.
pub fn exceeds(value: f64, limit: f64) -> bool {
    value > limit + TOLERANCE
}

/// Returns `true` if `value` is below the floor `limit` beyond tolerance.
pub fn falls_short(value: f64, limit: f64) -> bool {
    value < limit - TOLERANCE
}

/// Largest count `k` with `k * per_unit` not exceeding `limit`.
///
/// Inverts [`exceeds`], so `k` passes and `k + 1` fails. `per_unit` must be
/// positive; the result saturates at `u32::MAX`.
pub fn max_count(limit: f64, per_unit: f64) -> u32 {
    ((limit + TOLERANCE) / per_unit).floor() as u32
}

/// Smallest count `k` with `k * per_unit` not falling short of `limit`.
///
/// Inverts [`falls_short`]. `per_unit` must be positive.
pub fn min_count(limit: f64, per_unit: f64) -> u32 {
    ((limit - TOLERANCE) / per_unit).ceil().max(0.0) as u32
}

/// Upper bounds on parallel strings, one per limiting quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringCountCandidates {
    /// From the short-circuit current limit at `Tmax`.
    pub by_short_circuit: u32,
    /// From the continuous input current limit at `Tmax`.
    pub by_input_current: u32,
    /// From the per-tracker DC power limit at `Tmin` for the configured series count.
    pub by_power: u32,
    /// Manufacturer cap, if the datasheet specifies one.
    pub by_cap: Option<u32>,
}

impl StringCountCandidates {
    /// Tightest positive candidate, or 0 when no candidate is positive.
    ///
    /// Zero candidates and an unspecified cap do not participate.
    pub fn tightest(&self) -> u32 {
        [
            Some(self.by_short_circuit),
            Some(self.by_input_current),
            Some(self.by_power),
            self.by_cap,
        ]
        .into_iter()
        .flatten()
        .filter(|&k| k > 0)
        .min()
        .unwrap_or(0)
    }
}

/// Feasible topology bounds for one module on one tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeasibleBounds {
    /// Lowest modules per string that reaches the MPPT floor and start voltage when hot.
    pub min_modules_per_string: u32,
    /// Highest modules per string that stays under the DC maximum and MPPT ceiling when cold.
    pub max_modules_per_string: u32,
    pub string_candidates: StringCountCandidates,
    /// Smallest positive string candidate; 0 means every candidate was 0 and
    /// no parallel strings are permitted.
    pub max_parallel_strings: u32,
}

impl FeasibleBounds {
    /// Derives the bounds for `profile` against `limits`.
    ///
    /// The series range is independent of the configured topology. The power
    /// bound on parallel strings depends on `modules_per_string`.
    pub fn derive(
        profile: &ThermalProfile,
        limits: &EffectiveLimits,
        string_cap: Option<u32>,
        modules_per_string: u32,
    ) -> Self {
        let vmpp_hot = profile.vmpp_v.at_tmax;
        let min_modules_per_string = min_count(limits.mppt_min_v, vmpp_hot)
            .max(min_count(limits.start_voltage_v, vmpp_hot))
            .max(1);
        let max_modules_per_string = max_count(limits.max_dc_voltage_v, profile.voc_v.at_tmin)
            .min(max_count(limits.mppt_max_v, profile.vmpp_v.at_tmin));

        let string_power_w = f64::from(modules_per_string.max(1)) * profile.pmax_w.at_tmin;
        let string_candidates = StringCountCandidates {
            by_short_circuit: max_count(limits.max_short_circuit_current_a, profile.isc_a.at_tmax),
            by_input_current: max_count(limits.max_input_current_a, profile.impp_a.at_tmax),
            by_power: max_count(limits.max_dc_power_per_tracker_w, string_power_w),
            by_cap: string_cap,
        };

        Self {
            min_modules_per_string,
            max_modules_per_string,
            max_parallel_strings: string_candidates.tightest(),
            string_candidates,
        }
    }

    /// Feasible modules per string, or `None` when no series count satisfies
    /// every voltage limit.
    pub fn module_range(&self) -> Option<RangeInclusive<u32>> {
        (self.min_modules_per_string <= self.max_modules_per_string)
            .then(|| self.min_modules_per_string..=self.max_modules_per_string)
    }

}

impl fmt::Display for FeasibleBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.module_range() {
            Some(r) => write!(f, "modules/string {}..={}", r.start(), r.end())?,
            None => write!(
                f,
                "modules/string: no valid range ({} > {})",
                self.min_modules_per_string, self.max_modules_per_string
            )?,
        }
        match self.max_parallel_strings {
            0 => write!(f, ", parallel strings: none permitted"),
            s => write!(f, ", parallel strings 1..={s}"),
        }
    }
}
