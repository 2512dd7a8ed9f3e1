//! Shared test fixtures for integration tests.

use rand::Rng;
use rand::rngs::StdRng;

use pv_sizer::equipment::{CalculationParameters, Inverter, PvModule, StringConfiguration};

/// Module with Voc 45 V and a Voc coefficient of -0.29 %/°C.
pub fn reference_module() -> PvModule {
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

/// 600 V two-tracker inverter without a manufacturer string cap.
pub fn reference_inverter() -> Inverter {
    Inverter {
        manufacturer: "Voltra".to_string(),
        model: "V6K".to_string(),
        max_dc_power_w: 12_000.0,
        max_dc_voltage_v: 600.0,
        start_voltage_v: 120.0,
        mppt_voltage_range: "150-550".to_string(),
        nominal_dc_voltage_v: 360.0,
        max_input_current_a: 16.0,
        max_short_circuit_current_a: 22.0,
        tracker_count: 2,
        max_strings_per_mppt: 0,
    }
}

pub fn params(min_temp_c: f64, max_temp_c: f64, safety_margin_pct: f64) -> CalculationParameters {
    CalculationParameters {
        min_temp_c,
        max_temp_c,
        safety_margin_pct,
    }
}

/// Single enabled tracker carrying `module`.
pub fn tracker(index: u32, module: &PvModule, n: u32, s: u32) -> StringConfiguration {
    StringConfiguration::new(index, Some(module.clone())).with_topology(n, s)
}

/// Plausible crystalline module with random ratings and coefficients.
pub fn random_module(rng: &mut StdRng) -> PvModule {
    let voc_v = rng.random_range(30.0..55.0);
    let vmpp_v = voc_v * rng.random_range(0.78..0.86);
    let isc_a = rng.random_range(8.0..15.0);
    let impp_a = isc_a * rng.random_range(0.9..0.96);
    PvModule {
        manufacturer: "Random".to_string(),
        model: "R".to_string(),
        pmax_w: vmpp_v * impp_a,
        vmpp_v,
        impp_a,
        voc_v,
        isc_a,
        efficiency_pct: 20.0,
        temp_coeff_pmax_pct: rng.random_range(-0.45..-0.3),
        temp_coeff_voc_pct: rng.random_range(-0.35..-0.22),
        temp_coeff_isc_pct: rng.random_range(0.02..0.07),
    }
}

/// Plausible string inverter with a valid MPPT range.
pub fn random_inverter(rng: &mut StdRng) -> Inverter {
    let max_dc_voltage_v: f64 = rng.random_range(500.0..1100.0);
    let mppt_min: f64 = rng.random_range(80.0..250.0);
    let mppt_max: f64 = rng.random_range(400.0..max_dc_voltage_v * 0.9);
    let max_input_current_a: f64 = rng.random_range(10.0..30.0);
    Inverter {
        manufacturer: "Random".to_string(),
        model: "I".to_string(),
        max_dc_power_w: rng.random_range(3_000.0..20_000.0),
        max_dc_voltage_v,
        start_voltage_v: rng.random_range(80.0..200.0),
        mppt_voltage_range: format!("{mppt_min:.1}-{mppt_max:.1}"),
        nominal_dc_voltage_v: 0.0,
        max_input_current_a,
        max_short_circuit_current_a: max_input_current_a * rng.random_range(1.2..1.6),
        tracker_count: rng.random_range(1..=4),
        max_strings_per_mppt: rng.random_range(0..=3),
    }
}

pub fn random_params(rng: &mut StdRng) -> CalculationParameters {
    params(
        rng.random_range(-30.0..-5.0),
        rng.random_range(30.0..70.0),
        rng.random_range(0.0..20.0),
    )
}
