//! End-to-end evaluation scenarios through the public API.

mod common;

use approx::assert_relative_eq;
use pv_sizer::catalog::Catalog;
use pv_sizer::config::ScenarioConfig;
use pv_sizer::equipment::StringConfiguration;
use pv_sizer::sizing::{Check, Correction, TrackerResult, TrackerStatus, evaluate};

#[test]
fn cold_open_circuit_voltage_exceeds_derated_limit() {
    let module = common::reference_module();
    let result = evaluate(
        &common::reference_inverter(),
        &[common::tracker(1, &module, 12, 1)],
        &common::params(-20.0, 40.0, 10.0),
    );

    let limits = result.limits.expect("limits should be derived");
    assert_relative_eq!(limits.max_dc_voltage_v, 540.0);

    let e = result
        .tracker(1)
        .and_then(TrackerResult::evaluation)
        .expect("tracker 1 should be evaluated");
    assert_relative_eq!(e.profile.voc_v.at_tmin, 50.8725, epsilon = 1e-9);
    assert_relative_eq!(e.electricals.string_voc_v.at_tmin, 610.47, epsilon = 1e-9);

    let v = e
        .violations
        .iter()
        .find(|v| v.check == Check::MaxDcVoltage)
        .expect("max DC voltage check should fail");
    assert_eq!(v.correction, Correction::MaxModulesPerString(10));
    assert!(!result.passed());
}

#[test]
fn inverted_temperature_range_blocks_checks() {
    let module = common::reference_module();
    let result = evaluate(
        &common::reference_inverter(),
        &[common::tracker(1, &module, 12, 1)],
        &common::params(25.0, 25.0 - f64::EPSILON, 0.0),
    );
    assert!(!result.passed());
    assert_eq!(result.input_errors.len(), 1);
    assert!(result.input_errors[0].message.contains("max_temp_c"));
    assert_eq!(result.checked_count(), 0);
    assert!(result.trackers.iter().all(|t| t.violations().is_empty()));
}

#[test]
fn unspecified_string_cap_is_not_a_bound() {
    let module = common::reference_module();
    let mut inverter = common::reference_inverter();
    inverter.max_strings_per_mppt = 0;
    let params = common::params(-20.0, 40.0, 0.0);
    let result = evaluate(&inverter, &[common::tracker(1, &module, 10, 1)], &params);

    let bounds = &result
        .tracker(1)
        .and_then(TrackerResult::evaluation)
        .expect("tracker 1 should be evaluated")
        .bounds;
    // Isc(40) = 11.687 A -> floor(22 / 11.687) = 1; power 6000 W / 4745.75 W -> 1
    assert_eq!(bounds.string_candidates.by_cap, None);
    assert_eq!(bounds.string_candidates.by_short_circuit, 1);
    assert_eq!(bounds.max_parallel_strings, 1);

    inverter.max_strings_per_mppt = 4;
    let capped = evaluate(&inverter, &[common::tracker(1, &module, 10, 1)], &params);
    let bounds = &capped
        .tracker(1)
        .and_then(TrackerResult::evaluation)
        .expect("tracker 1 should be evaluated")
        .bounds;
    assert_eq!(bounds.string_candidates.by_cap, Some(4));
    assert_eq!(bounds.max_parallel_strings, 1);
}

#[test]
fn compliant_configuration_passes_cleanly() {
    let module = common::reference_module();
    let result = evaluate(
        &common::reference_inverter(),
        &[
            common::tracker(1, &module, 10, 1),
            common::tracker(2, &module, 9, 1),
        ],
        &common::params(-20.0, 40.0, 10.0),
    );
    assert!(result.passed(), "{result}");
    assert!(result.messages().is_empty());
    assert!(result.trackers.iter().all(|t| t.passed() == Some(true)));
    assert!(result.incomplete_trackers().is_empty());
}

#[test]
fn missing_trackers_are_synthesized_without_module() {
    let module = common::reference_module();
    let mut inverter = common::reference_inverter();
    inverter.tracker_count = 3;
    let result = evaluate(
        &inverter,
        &[common::tracker(2, &module, 7, 1)],
        &common::params(-20.0, 40.0, 10.0),
    );
    let statuses: Vec<&TrackerStatus> = result.trackers.iter().map(|t| &t.status).collect();
    assert_eq!(statuses.len(), 3);
    assert_eq!(statuses[0], &TrackerStatus::NoModule);
    assert!(matches!(statuses[1], TrackerStatus::Evaluated(_)));
    assert_eq!(statuses[2], &TrackerStatus::NoModule);
    assert_eq!(result.incomplete_trackers(), vec![1, 3]);
    assert!(result.passed());
}

#[test]
fn disabled_tracker_is_reported_but_not_checked() {
    let module = common::reference_module();
    let disabled: StringConfiguration = common::tracker(1, &module, 30, 9).enabled(false);
    let result = evaluate(
        &common::reference_inverter(),
        &[disabled, common::tracker(2, &module, 10, 1)],
        &common::params(-20.0, 40.0, 10.0),
    );
    assert_eq!(result.trackers[0].status, TrackerStatus::Disabled);
    assert!(result.passed());
    assert!(result.to_string().contains("disabled"));
}

#[test]
fn oversized_preset_reports_every_string_violation() {
    let result = ScenarioConfig::oversized()
        .resolve(&Catalog::builtin())
        .expect("preset resolves")
        .evaluate();
    let checks: Vec<Check> = result
        .tracker(1)
        .map(|t| t.violations().iter().map(|v| v.check).collect())
        .unwrap_or_default();
    assert_eq!(
        checks,
        vec![
            Check::ShortCircuitCurrent,
            Check::InputCurrent,
            Check::StringCap,
            Check::DcPower
        ]
    );
    let bounds = &result
        .tracker(1)
        .and_then(TrackerResult::evaluation)
        .expect("tracker 1 should be evaluated")
        .bounds;
    // input current and power each admit no string; short-circuit current and the cap admit one
    assert_eq!(bounds.string_candidates.by_input_current, 0);
    assert_eq!(bounds.string_candidates.by_power, 0);
    assert_eq!(bounds.max_parallel_strings, 1);
    assert!(result.to_string().contains("- Max parallel strings: 1\n"));

    let messages = result.messages();
    assert!(messages.iter().all(|m| m.starts_with("Tracker ")));
    assert!(messages.iter().any(|m| m.contains("no parallel strings permitted")));
}
