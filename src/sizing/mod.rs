//! Electrical compatibility evaluation of a PV array against an inverter.
//!
//! The entry point is [`evaluate`]. The submodules expose the individual
//! steps: margin-adjusted limits, temperature compensation, the limit checks,
//! and the feasible-range derivation.

pub mod bounds;
pub mod checks;
pub mod evaluator;
pub mod limits;
pub mod report;
pub mod thermal;

pub use bounds::FeasibleBounds;
pub use checks::{Check, Correction, Violation};
pub use evaluator::evaluate;
pub use limits::EffectiveLimits;
pub use report::{Evaluation, InputError, TrackerEvaluation, TrackerResult, TrackerStatus};
pub use thermal::{StringElectricals, TempPair, ThermalProfile};
