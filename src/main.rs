//! PV string sizing entry point: CLI wiring and catalog-driven evaluation.

use std::io;
use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use pv_sizer::catalog::Catalog;
use pv_sizer::cli::{CliOptions, parse_args};
use pv_sizer::config::ScenarioConfig;
use pv_sizer::io::export::export_csv;

/// Exit code for argument, scenario, and catalog errors.
const EXIT_CONFIG_ERROR: i32 = 1;
/// Exit code when the array does not pass every check.
const EXIT_EVALUATION_FAILED: i32 = 2;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    process::exit(EXIT_CONFIG_ERROR);
}

fn load_scenario(cli: &CliOptions) -> ScenarioConfig {
    let loaded = match (&cli.scenario, &cli.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path),
        (None, Some(name)) => ScenarioConfig::from_preset(name),
        (None, None) => Ok(ScenarioConfig::demo()),
    };
    let mut scenario = loaded.unwrap_or_else(|e| fail(e));

    let p = &mut scenario.parameters;
    if let Some(t) = cli.min_temp_c {
        p.min_temp_c = t;
    }
    if let Some(t) = cli.max_temp_c {
        p.max_temp_c = t;
    }
    if let Some(m) = cli.safety_margin_pct {
        p.safety_margin_pct = m;
    }
    scenario
}

fn main() {
    init_logging();

    let cli = parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        pv_sizer::cli::print_usage();
        process::exit(EXIT_CONFIG_ERROR);
    });

    let scenario = load_scenario(&cli);

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(EXIT_CONFIG_ERROR);
    }

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_json_file(path).unwrap_or_else(|e| fail(format!("error: {e}"))),
        None => Catalog::builtin(),
    };

    let resolved = scenario.resolve(&catalog).unwrap_or_else(|errors| {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(EXIT_CONFIG_ERROR);
    });

    if let Some(path) = &cli.save_scenario {
        if let Err(e) = scenario.save_toml_file(path) {
            fail(e);
        }
        eprintln!("Scenario written to {}", path.display());
    }

    let evaluation = resolved.evaluate();
    println!("{evaluation}");

    if let Some(path) = &cli.results_out {
        if let Err(e) = export_csv(&evaluation, path) {
            fail(format!("error: failed to write CSV: {e}"));
        }
        eprintln!("Results written to {}", path.display());
    }

    info!(passed = evaluation.passed(), "done");
    if !evaluation.passed() {
        process::exit(EXIT_EVALUATION_FAILED);
    }
}
