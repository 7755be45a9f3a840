//! Constraint engine boundary and the bundled reference engine.
//!
//! The rest of the crate builds a [`Model`] and talks to any engine
//! through [`CpSolver`]; [`BranchBoundSolver`] is the implementation
//! shipped with the crate. Production deployments can substitute a
//! heavier engine without touching the formulation layer.

mod branch;
mod model;

pub use branch::BranchBoundSolver;
pub use model::{
    CpSolver, LinExpr, LinearConstraint, Model, Relation, Solution, SolveStats, SolveStatus,
    SolverConfig, VarId,
};
