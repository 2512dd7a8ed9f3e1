use std::env;
use std::path::PathBuf;

pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub catalog: Option<PathBuf>,
    pub min_temp_c: Option<f64>,
    pub max_temp_c: Option<f64>,
    pub safety_margin_pct: Option<f64>,
    pub results_out: Option<PathBuf>,
    pub save_scenario: Option<PathBuf>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions {
        scenario: None,
        preset: None,
        catalog: None,
        min_temp_c: None,
        max_temp_c: None,
        safety_margin_pct: None,
        results_out: None,
        save_scenario: None,
    };

    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        match flag {
            "--scenario" => {
                let path = args.next_or_err(i, "missing value for --scenario (expected a TOML file path)")?;
                set_once(&mut opts.scenario, PathBuf::from(path), flag)?;
            }
            "--preset" => {
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                set_once(&mut opts.preset, name.to_string(), flag)?;
            }
            "--catalog" => {
                let path = args.next_or_err(i, "missing value for --catalog (expected a JSON file path)")?;
                set_once(&mut opts.catalog, PathBuf::from(path), flag)?;
            }
            "--tmin" => {
                let v = parse_number(args, i, flag, "°C")?;
                set_once(&mut opts.min_temp_c, v, flag)?;
            }
            "--tmax" => {
                let v = parse_number(args, i, flag, "°C")?;
                set_once(&mut opts.max_temp_c, v, flag)?;
            }
            "--margin" => {
                let v = parse_number(args, i, flag, "%")?;
                set_once(&mut opts.safety_margin_pct, v, flag)?;
            }
            "--results-out" => {
                let path = args.next_or_err(i, "missing value for --results-out (expected a file path)")?;
                set_once(&mut opts.results_out, PathBuf::from(path), flag)?;
            }
            "--save-scenario" => {
                let path = args.next_or_err(i, "missing value for --save-scenario (expected a file path)")?;
                set_once(&mut opts.save_scenario, PathBuf::from(path), flag)?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if opts.scenario.is_none() && opts.preset.is_none() {
        opts.preset = Some("demo".to_string());
    }

    Ok(opts)
}

fn set_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.replace(value).is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

fn parse_number(args: &[String], index: usize, flag: &str, unit: &str) -> Result<f64, String> {
    let raw = args.next_or_err(index, &format!("missing value for {flag} (expected a number in {unit})"))?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid value for {flag}: \"{raw}\" is not a number"))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("pv-sizer: check a PV array against inverter limits over a temperature range");
    eprintln!();
    eprintln!("Usage: pv-sizer [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (demo, cold_climate, oversized)");
    eprintln!("  --catalog <path>         Load modules and inverters from a JSON catalog");
    eprintln!("  --tmin <°C>              Override the minimum temperature");
    eprintln!("  --tmax <°C>              Override the maximum temperature");
    eprintln!("  --margin <%>             Override the safety margin");
    eprintln!("  --results-out <path>     Export per-tracker results to CSV");
    eprintln!("  --save-scenario <path>   Write the effective scenario to TOML");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the demo preset is used.");
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn supports_scenario_cli() {
        let opts = parse_args_from(args(&["--scenario", "scenario.toml"]))
            .expect("parse should succeed");
        assert_eq!(
            opts.scenario.as_deref().and_then(|p| p.to_str()),
            Some("scenario.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn defaults_to_demo_preset() {
        let opts = parse_args_from(Vec::new()).expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("demo"));
        assert!(opts.catalog.is_none());
    }

    #[test]
    fn parses_parameter_overrides() {
        let opts = parse_args_from(args(&[
            "--preset", "oversized", "--tmin", "-25", "--tmax", "45.5", "--margin", "0",
        ]))
        .expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("oversized"));
        assert_eq!(opts.min_temp_c, Some(-25.0));
        assert_eq!(opts.max_temp_c, Some(45.5));
        assert_eq!(opts.safety_margin_pct, Some(0.0));
    }

    #[test]
    fn rejects_conflicting_sources() {
        let err = parse_args_from(args(&["--scenario", "a.toml", "--preset", "demo"]))
            .err()
            .expect("conflict should fail");
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn rejects_bad_numbers_and_missing_values() {
        assert!(parse_args_from(args(&["--tmin", "cold"])).is_err());
        assert!(parse_args_from(args(&["--margin", "NaN"])).is_err());
        assert!(parse_args_from(args(&["--results-out"])).is_err());
        assert!(parse_args_from(args(&["--tmax", "40", "--tmax", "45"])).is_err());
        assert!(parse_args_from(args(&["--bogus"])).is_err());
    }
}
