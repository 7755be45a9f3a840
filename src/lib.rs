//! Half-day rostering for hospital physician groups.
//!
//! Builds yearly duty rosters over a morning/afternoon grid: each
//! decision is one physician holding one role for one half-day. The
//! crate turns contracted FTE fractions into annual duty budgets,
//! compiles staffing rules into an integer-linear constraint model,
//! and hands that model to a pluggable engine.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Physician`, `Role`, `HalfDay`,
//!   `SchedulingInput`, `Schedule`, `Assignment`, budget derivation
//! - **`cp`**: Constraint compiler — slot variable space, stage-by-stage
//!   rule formulation, objective assembly
//! - **`solver`**: Integer-linear model, engine trait, and the built-in
//!   branch-and-bound reference engine
//! - **`scheduler`**: Phase-checked orchestration pipeline and roster KPIs
//! - **`validation`**: Input integrity checks before any model is built
//! - **`export`**: CSV and JSON roster output, CSV re-import
//!
//! # Architecture
//!
//! Formulation and search are strictly separated: the `cp` stages only
//! emit linear rows over variables they obtained from the shared slot
//! space, and everything downstream of `solve` goes through the
//! `solver::CpSolver` trait. Swapping engines never touches the
//! formulation.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review
//!   of applications, methods and models"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

#![forbid(unsafe_code)]

pub mod cp;
pub mod export;
pub mod models;
pub mod scheduler;
pub mod solver;
pub mod validation;
