//! The compatibility evaluator.

use tracing::{debug, info, warn};

use super::bounds::FeasibleBounds;
use super::checks::run_checks;
use super::limits::EffectiveLimits;
use super::report::{Evaluation, InputError, TrackerEvaluation, TrackerResult, TrackerStatus};
use super::thermal::{StringElectricals, ThermalProfile};
use crate::equipment::{CalculationParameters, Inverter, MpptRange, PvModule, StringConfiguration};

/// Evaluates a PV array against an inverter over the parameter temperature range.
///
/// `trackers` is matched to the inverter's tracker slots by index; missing
/// slots are reported as having no module. The function never fails: input
/// problems are collected in [`Evaluation::input_errors`] and every check
/// that can still run does.
///
/// # Arguments
///
/// * `inverter` - Inverter datasheet record
/// * `trackers` - String wiring per tracker (1-based `tracker` index)
/// * `parameters` - Temperature range and safety margin
///
/// # Returns
///
/// An [`Evaluation`] with one [`TrackerResult`] per inverter tracker.
pub fn evaluate(
    inverter: &Inverter,
    trackers: &[StringConfiguration],
    parameters: &CalculationParameters,
) -> Evaluation {
    let mut input_errors = parameters.validate();

    let limit_errors = inverter_limit_errors(inverter);
    let inverter_usable = limit_errors.is_empty();
    input_errors.extend(limit_errors);

    if inverter.tracker_count == 0 {
        input_errors.push(InputError::new(
            "inverter.tracker_count",
            "must be >= 1; evaluating a single tracker",
        ));
    }

    let mppt = match MpptRange::parse(&inverter.mppt_voltage_range) {
        Ok(range) => Some(range),
        Err(e) => {
            input_errors.push(InputError::new("inverter.mppt_voltage_range", e.to_string()));
            None
        }
    };

    let limits = mppt
        .filter(|_| inverter_usable)
        .map(|range| EffectiveLimits::derive(inverter, range, parameters.margin_fraction()));
    let checkable = limits.filter(|_| parameters.has_valid_temperatures());

    let slots = assign_slots(trackers, inverter.tracker_count.max(1), &mut input_errors);
    let cap = inverter.string_cap();

    let results: Vec<TrackerResult> = slots
        .into_iter()
        .zip(1u32..)
        .map(|(config, index)| {
            let status = match config {
                None => TrackerStatus::NoModule,
                Some(c) if !c.enabled => TrackerStatus::Disabled,
                Some(StringConfiguration { module: None, .. }) => TrackerStatus::NoModule,
                Some(c) => match (&c.module, &checkable) {
                    (Some(module), Some(limits)) => evaluate_tracker(
                        index,
                        c,
                        module,
                        parameters,
                        limits,
                        cap,
                        &mut input_errors,
                    ),
                    _ => TrackerStatus::NotChecked,
                },
            };
            TrackerResult {
                tracker: index,
                status,
            }
        })
        .collect();

    let evaluation = Evaluation {
        inverter: inverter.display_name(),
        parameters: *parameters,
        limits,
        input_errors,
        trackers: results,
    };

    for message in evaluation.messages() {
        warn!("{message}");
    }
    info!(
        passed = evaluation.passed(),
        trackers = evaluation.trackers.len(),
        checked = evaluation.checked_count(),
        incomplete = evaluation.incomplete_trackers().len(),
        input_errors = evaluation.input_errors.len(),
        "evaluation complete"
    );

    evaluation
}

/// Inverter limits must be finite and non-negative to be derated.
fn inverter_limit_errors(inverter: &Inverter) -> Vec<InputError> {
    [
        ("inverter.max_dc_power_w", inverter.max_dc_power_w),
        ("inverter.max_dc_voltage_v", inverter.max_dc_voltage_v),
        ("inverter.start_voltage_v", inverter.start_voltage_v),
        ("inverter.max_input_current_a", inverter.max_input_current_a),
        (
            "inverter.max_short_circuit_current_a",
            inverter.max_short_circuit_current_a,
        ),
    ]
    .into_iter()
    .filter(|(_, v)| !(v.is_finite() && *v >= 0.0))
    .map(|(field, v)| InputError::new(field, format!("must be a finite non-negative number, got {v}")))
    .collect()
}

/// Places each configuration into its tracker slot.
///
/// Indices outside `1..=tracker_count` and repeated indices are reported and
/// ignored. Slots left empty are `None`.
fn assign_slots<'a>(
    trackers: &'a [StringConfiguration],
    tracker_count: u32,
    errors: &mut Vec<InputError>,
) -> Vec<Option<&'a StringConfiguration>> {
    let mut slots: Vec<Option<&StringConfiguration>> = vec![None; tracker_count as usize];

    for config in trackers {
        let field = format!("tracker[{}]", config.tracker);
        if config.tracker == 0 || config.tracker > tracker_count {
            errors.push(InputError::new(
                field,
                format!("index must be in 1..={tracker_count}; ignored"),
            ));
            continue;
        }
        let slot = &mut slots[(config.tracker - 1) as usize];
        if slot.is_some() {
            errors.push(InputError::new(field, "duplicate tracker index; ignored"));
            continue;
        }
        *slot = Some(config);
    }

    slots
}

/// Rejects module data the checks cannot divide by.
fn module_errors(
    index: u32,
    module: &PvModule,
    profile: &ThermalProfile,
) -> Option<InputError> {
    let field = format!("tracker[{index}].module");
    let stc = [
        ("Voc", module.voc_v),
        ("Vmpp", module.vmpp_v),
        ("Pmax", module.pmax_w),
        ("Isc", module.isc_a),
    ];
    let bad_stc: Vec<&str> = stc
        .iter()
        .filter(|(_, v)| !(v.is_finite() && *v > 0.0))
        .map(|(name, _)| *name)
        .collect();
    if !bad_stc.is_empty() {
        return Some(InputError::new(
            field,
            format!("{}: STC values must be positive", bad_stc.join(", ")),
        ));
    }

    let bad_range = profile.non_positive_quantities();
    (!bad_range.is_empty()).then(|| {
        InputError::new(
            field,
            format!(
                "{}: not positive over the temperature range",
                bad_range.join(", ")
            ),
        )
    })
}

/// Zero counts are reported and evaluated as 1.
fn count_or_one(value: u32, field: String, errors: &mut Vec<InputError>) -> u32 {
    if value == 0 {
        errors.push(InputError::new(field, "must be >= 1; evaluated as 1"));
        1
    } else {
        value
    }
}

fn evaluate_tracker(
    index: u32,
    config: &StringConfiguration,
    module: &PvModule,
    parameters: &CalculationParameters,
    limits: &EffectiveLimits,
    cap: Option<u32>,
    errors: &mut Vec<InputError>,
) -> TrackerStatus {
    let profile = ThermalProfile::new(module, parameters);
    if let Some(e) = module_errors(index, module, &profile) {
        errors.push(e);
        return TrackerStatus::Invalid;
    }

    let n = count_or_one(
        config.modules_per_string,
        format!("tracker[{index}].modules_per_string"),
        errors,
    );
    let s = count_or_one(
        config.parallel_strings,
        format!("tracker[{index}].parallel_strings"),
        errors,
    );

    let electricals = StringElectricals::new(&profile, n, s);
    let violations = run_checks(&profile, &electricals, limits, cap);
    let bounds = FeasibleBounds::derive(&profile, limits, cap, n);

    debug!(
        tracker = index,
        modules_per_string = n,
        parallel_strings = s,
        violations = violations.len(),
        %bounds,
        "tracker evaluated"
    );

    TrackerStatus::Evaluated(Box::new(TrackerEvaluation {
        module: module.display_name(),
        profile,
        electricals,
        violations,
        bounds,
    }))
}
