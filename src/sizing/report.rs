//! Evaluation results: per-tracker outcomes, diagnostics, and the text summary.

use std::fmt;

use super::bounds::FeasibleBounds;
use super::checks::Violation;
use super::limits::EffectiveLimits;
use super::thermal::{StringElectricals, ThermalProfile};
use crate::equipment::CalculationParameters;

/// An input problem found during evaluation.
///
/// Input errors never abort an evaluation; they are collected and reported
/// alongside whatever could still be computed.
#[derive(Debug, Clone, PartialEq)]
pub struct InputError {
    /// Dotted field path (e.g., `"parameters.min_temp_c"`, `"tracker[2].module"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl InputError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input error: {}: {}", self.field, self.message)
    }
}

/// Numeric outcome for a tracker that went through the checks.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerEvaluation {
    /// Display name of the module on this tracker.
    pub module: String,
    pub profile: ThermalProfile,
    pub electricals: StringElectricals,
    /// Failed checks; empty when the tracker passes.
    pub violations: Vec<Violation>,
    pub bounds: FeasibleBounds,
}

impl TrackerEvaluation {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// What happened to one tracker during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerStatus {
    /// Enabled with a module; all checks ran.
    Evaluated(Box<TrackerEvaluation>),
    /// Switched off by the user; excluded from checks.
    Disabled,
    /// Enabled but no module selected; excluded from checks.
    NoModule,
    /// Module data cannot be evaluated over the temperature range.
    Invalid,
    /// Global input errors prevented any numeric check.
    NotChecked,
}

impl TrackerStatus {
    /// Short identifier used in exports.
    pub fn key(&self) -> &'static str {
        match self {
            TrackerStatus::Evaluated(e) if e.passed() => "pass",
            TrackerStatus::Evaluated(_) => "fail",
            TrackerStatus::Disabled => "disabled",
            TrackerStatus::NoModule => "no_module",
            TrackerStatus::Invalid => "invalid",
            TrackerStatus::NotChecked => "not_checked",
        }
    }
}

/// Result for one MPPT tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerResult {
    /// 1-based tracker index.
    pub tracker: u32,
    pub status: TrackerStatus,
}

impl TrackerResult {
    /// Numeric evaluation, if the tracker was checked.
    pub fn evaluation(&self) -> Option<&TrackerEvaluation> {
        match &self.status {
            TrackerStatus::Evaluated(e) => Some(e),
            _ => None,
        }
    }

    /// `Some(pass)` for checked trackers, `None` otherwise.
    pub fn passed(&self) -> Option<bool> {
        self.evaluation().map(TrackerEvaluation::passed)
    }

    /// Returns `true` for disabled trackers and trackers without a module.
    pub fn is_incomplete(&self) -> bool {
        matches!(self.status, TrackerStatus::Disabled | TrackerStatus::NoModule)
    }

    /// Failed checks of this tracker (empty unless evaluated and failing).
    pub fn violations(&self) -> &[Violation] {
        self.evaluation().map_or(&[], |e| e.violations.as_slice())
    }

    /// Messages labeled with the tracker index.
    pub fn messages(&self) -> Vec<String> {
        if matches!(self.status, TrackerStatus::NoModule) {
            return vec![format!("Tracker {}: no PV module selected", self.tracker)];
        }
        self.violations()
            .iter()
            .map(|v| format!("Tracker {}: {v}", self.tracker))
            .collect()
    }
}

/// Aggregate outcome of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Display name of the inverter.
    pub inverter: String,
    pub parameters: CalculationParameters,
    /// Effective limits, or `None` when input errors prevented deriving them.
    pub limits: Option<EffectiveLimits>,
    pub input_errors: Vec<InputError>,
    /// One entry per inverter tracker, ordered by index.
    pub trackers: Vec<TrackerResult>,
}

impl Evaluation {
    /// Overall verdict.
    ///
    /// `true` when there are no input errors and every checked tracker passes.
    /// This is stricter than the AND over checked trackers alone: an input
    /// error fails the verdict even when evaluation recovered from it, such as
    /// a clamped margin or an ignored duplicate tracker index. Disabled
    /// trackers and trackers without a module do not fail the verdict; see
    /// [`Evaluation::incomplete_trackers`].
    pub fn passed(&self) -> bool {
        self.input_errors.is_empty()
            && self
                .trackers
                .iter()
                .all(|t| t.passed().unwrap_or(true))
    }

    /// Indices of disabled trackers and trackers without a module.
    pub fn incomplete_trackers(&self) -> Vec<u32> {
        self.trackers
            .iter()
            .filter(|t| t.is_incomplete())
            .map(|t| t.tracker)
            .collect()
    }

    /// Number of trackers that went through the checks.
    pub fn checked_count(&self) -> usize {
        self.trackers.iter().filter(|t| t.evaluation().is_some()).count()
    }

    pub fn tracker(&self, index: u32) -> Option<&TrackerResult> {
        self.trackers.iter().find(|t| t.tracker == index)
    }

    /// Flat message list: input errors first, then tracker messages in index order.
    pub fn messages(&self) -> Vec<String> {
        self.input_errors
            .iter()
            .map(ToString::to_string)
            .chain(self.trackers.iter().flat_map(TrackerResult::messages))
            .collect()
    }
}

fn write_tracker(f: &mut fmt::Formatter<'_>, t: &TrackerResult) -> fmt::Result {
    writeln!(f, "Tracker {}:", t.tracker)?;
    let e = match &t.status {
        TrackerStatus::Evaluated(e) => e,
        TrackerStatus::Disabled => return writeln!(f, "- disabled, excluded from checks"),
        TrackerStatus::NoModule => return writeln!(f, "- no PV module selected"),
        TrackerStatus::Invalid => {
            return writeln!(f, "- module data invalid for this temperature range");
        }
        TrackerStatus::NotChecked => return writeln!(f, "- not checked"),
    };

    let x = &e.electricals;
    writeln!(f, "- Module: {}", e.module)?;
    writeln!(
        f,
        "- Settings: modules/string={}, parallel strings={}",
        x.modules_per_string, x.parallel_strings
    )?;
    writeln!(
        f,
        "- String Voc: min={:.1} V, max={:.1} V",
        x.string_voc_v.min(),
        x.string_voc_v.max()
    )?;
    writeln!(
        f,
        "- String Vmpp: min={:.1} V, max={:.1} V",
        x.string_vmpp_v.min(),
        x.string_vmpp_v.max()
    )?;
    writeln!(
        f,
        "- String Isc: min={:.2} A, max={:.2} A",
        x.string_isc_a.min(),
        x.string_isc_a.max()
    )?;
    writeln!(
        f,
        "- String Impp: min={:.2} A, max={:.2} A",
        x.string_impp_a.min(),
        x.string_impp_a.max()
    )?;
    writeln!(
        f,
        "- Array current: Isc min={:.2} A / max={:.2} A; Impp min={:.2} A / max={:.2} A",
        x.array_isc_a.min(),
        x.array_isc_a.max(),
        x.array_impp_a.min(),
        x.array_impp_a.max()
    )?;
    writeln!(f, "- DC power (cold): {:.0} W", x.array_power_w.at_tmin)?;

    match e.bounds.module_range() {
        Some(r) => writeln!(f, "- Feasible modules/string: {}..={}", r.start(), r.end())?,
        None => writeln!(f, "- Feasible modules/string: no valid range")?,
    }
    match e.bounds.max_parallel_strings {
        0 => writeln!(f, "- Max parallel strings: none permitted")?,
        s => writeln!(f, "- Max parallel strings: {s}")?,
    }

    if !e.violations.is_empty() {
        writeln!(f, "- Violations:")?;
        for v in &e.violations {
            writeln!(f, "  - {v}")?;
        }
    }
    Ok(())
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.parameters;
        writeln!(f, "--- String Sizing Report ---")?;
        writeln!(f, "Inverter:     {}", self.inverter)?;
        writeln!(
            f,
            "Parameters:   Tmin={} °C, Tmax={} °C, safety margin={} %",
            p.min_temp_c, p.max_temp_c, p.safety_margin_pct
        )?;
        match &self.limits {
            Some(l) => writeln!(f, "Limits:       {l}")?,
            None => writeln!(f, "Limits:       unavailable")?,
        }
        if !self.input_errors.is_empty() {
            writeln!(f, "Input errors:")?;
            for e in &self.input_errors {
                writeln!(f, "- {}: {}", e.field, e.message)?;
            }
        }

        for t in &self.trackers {
            writeln!(f)?;
            write_tracker(f, t)?;
        }

        writeln!(f)?;
        let verdict = if self.passed() {
            "all limits satisfied"
        } else {
            "limits violated or inputs invalid"
        };
        write!(f, "Result: {verdict}")?;

        let messages = self.messages();
        if !messages.is_empty() {
            writeln!(f)?;
            write!(f, "Messages:")?;
            for m in &messages {
                write!(f, "\n- {m}")?;
            }
        }
        Ok(())
    }
}
