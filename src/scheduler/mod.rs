//! Roster orchestration and quality metrics.
//!
//! `RosterPipeline` walks the formulation through validation,
//! variable creation, constraint stages, objective assembly, solving,
//! and extraction, with every step phase-checked. `RosterKpi` scores
//! an extracted roster's distribution.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review
//!   of applications, methods and models"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

mod kpi;
mod roster;

pub use kpi::RosterKpi;
pub use roster::{Phase, RosterError, RosterOutcome, RosterPipeline};
