//! PV array string sizing against inverter electrical limits.

/// Module and inverter catalog loading and lookup.
pub mod catalog;
pub mod cli;
pub mod config;
pub mod equipment;
pub mod io;
/// Limit derivation, temperature compensation, checks, and reports.
pub mod sizing;
