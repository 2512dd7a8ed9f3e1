//! CSV export for per-tracker evaluation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sizing::{Evaluation, TrackerResult};

/// Column header for the per-tracker CSV export.
const HEADER: &str = "tracker,status,modules_per_string,parallel_strings,\
                      string_voc_cold_v,string_vmpp_hot_v,string_vmpp_cold_v,\
                      array_isc_hot_a,array_impp_hot_a,array_power_cold_w,\
                      modules_min,modules_max,strings_max,passed";

const COLUMNS: usize = 14;

/// Exports per-tracker results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tracker. Trackers that
/// were not evaluated keep their index and status and leave every other
/// column empty.
///
/// # Arguments
///
/// * `evaluation` - Completed evaluation
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(evaluation: &Evaluation, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(evaluation, buf)
}

/// Writes per-tracker results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(evaluation: &Evaluation, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;
    for t in &evaluation.trackers {
        wtr.write_record(row(t))?;
    }

    wtr.flush()?;
    Ok(())
}

fn row(t: &TrackerResult) -> Vec<String> {
    let mut fields = vec![t.tracker.to_string(), t.status.key().to_string()];

    let Some(e) = t.evaluation() else {
        fields.resize(COLUMNS, String::new());
        return fields;
    };

    let x = &e.electricals;
    let (modules_min, modules_max) = match e.bounds.module_range() {
        Some(r) => (r.start().to_string(), r.end().to_string()),
        None => (String::new(), String::new()),
    };
    fields.extend([
        x.modules_per_string.to_string(),
        x.parallel_strings.to_string(),
        format!("{:.2}", x.string_voc_v.at_tmin),
        format!("{:.2}", x.string_vmpp_v.at_tmax),
        format!("{:.2}", x.string_vmpp_v.at_tmin),
        format!("{:.3}", x.array_isc_a.at_tmax),
        format!("{:.3}", x.array_impp_a.at_tmax),
        format!("{:.1}", x.array_power_w.at_tmin),
        modules_min,
        modules_max,
        e.bounds.max_parallel_strings.to_string(),
        e.passed().to_string(),
    ]);
    fields
}
