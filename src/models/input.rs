//! Scheduling input aggregate.
//!
//! Bundles the physicians, the calendar, the roles in scope for the
//! run, and per-role coverage requirements. The compiler only ever
//! reads from this aggregate; validation checks it up front.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::physician::Physician;
use super::role::Role;

/// Daily staffing bounds for one role. The role itself is the map key
/// in [`SchedulingInput::coverage_requirements`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRequirement {
    /// Minimum half-day units of this role per day.
    pub min_physicians: i64,
    /// Optional maximum half-day units of this role per day.
    pub max_physicians: Option<i64>,
}

impl CoverageRequirement {
    /// Creates a minimum-only requirement.
    pub fn at_least(min_physicians: i64) -> Self {
        Self {
            min_physicians,
            max_physicians: None,
        }
    }

    /// Creates a bounded requirement.
    pub fn between(min_physicians: i64, max_physicians: i64) -> Self {
        Self {
            min_physicians,
            max_physicians: Some(max_physicians),
        }
    }
}

/// Everything one planning run needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulingInput {
    /// Physicians to roster.
    pub physicians: Vec<Physician>,
    /// Ordered calendar days of the planning horizon.
    pub calendar_days: Vec<NaiveDate>,
    /// Roles in scope for this run.
    pub roles: Vec<Role>,
    /// Coverage requirement per in-scope role.
    pub coverage_requirements: BTreeMap<Role, CoverageRequirement>,
}

impl SchedulingInput {
    /// Creates an empty input; fill it with the builder methods.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: adds one physician.
    pub fn with_physician(mut self, physician: Physician) -> Self {
        self.physicians.push(physician);
        self
    }

    /// Builder: sets the calendar.
    pub fn with_calendar_days(mut self, days: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.calendar_days = days.into_iter().collect();
        self
    }

    /// Builder: sets the roles in scope.
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Builder: adds a coverage requirement for one role.
    pub fn with_coverage(mut self, role: Role, requirement: CoverageRequirement) -> Self {
        self.coverage_requirements.insert(role, requirement);
        self
    }

    /// Builder: backfills a min-zero, no-max requirement for every
    /// in-scope role that has none yet. Call after `with_roles` and
    /// any explicit `with_coverage` entries.
    pub fn with_loose_coverage(mut self) -> Self {
        for role in &self.roles {
            self.coverage_requirements
                .entry(*role)
                .or_insert_with(|| CoverageRequirement::at_least(0));
        }
        self
    }

    /// Position of a date in the calendar, if present.
    pub fn day_index(&self, day: NaiveDate) -> Option<usize> {
        self.calendar_days.iter().position(|d| *d == day)
    }

    /// Position of a physician by name, if present.
    pub fn physician_index(&self, name: &str) -> Option<usize> {
        self.physicians.iter().position(|p| p.name == name)
    }

    /// Whether a role is in scope for this run.
    #[inline]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Whole calendar weeks in the horizon, at least one.
    #[inline]
    pub fn week_count(&self) -> usize {
        (self.calendar_days.len() / 7).max(1)
    }
}

/// Consecutive calendar dates starting at `start`, weekends included.
pub fn consecutive_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    start.iter_days().take(count).collect()
}
