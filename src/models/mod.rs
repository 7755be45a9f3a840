//! Rostering domain models.
//!
//! Core data types for physician half-day rostering: the role
//! catalogue and period grid, physicians with FTE-derived yearly
//! budgets, the input aggregate a planning run consumes, and the
//! schedule a successful solve produces.

mod input;
mod physician;
mod role;
mod schedule;

pub use input::{consecutive_days, CoverageRequirement, SchedulingInput};
pub use physician::{
    half_day_units, round_to_half_day, AnnualBudgets, AnnualTarget, FteError, Physician,
    VacationCategory, BUDGET_TOLERANCE_DAYS, FTE_TOLERANCE, INSTITUTIONAL_YEAR_DAYS,
    TRIP_DAYS_PER_YEAR,
};
pub use role::{HalfDay, Role, RoleCategory, UnknownHalfDay, UnknownRole};
pub use schedule::{Assignment, Schedule};
