//! Roster (solution) model.
//!
//! A schedule is the complete set of half-day role assignments
//! produced by one successful solve. It is built once during
//! extraction and then only queried.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::role::{HalfDay, Role};

/// One physician working one role for one half-day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    /// Calendar day.
    pub day: NaiveDate,
    /// Morning or afternoon.
    pub period: HalfDay,
    /// Assigned physician, by name.
    pub physician: String,
    /// Duty role for the half-day.
    pub role: Role,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(physician: impl Into<String>, day: NaiveDate, period: HalfDay, role: Role) -> Self {
        Self {
            day,
            period,
            physician: physician.into(),
            role,
        }
    }
}

/// A complete half-day roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments ordered by day, period, physician, role.
    pub assignments: Vec<Assignment>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schedule from assignments, normalizing the order.
    pub fn from_assignments(mut assignments: Vec<Assignment>) -> Self {
        assignments.sort();
        Self { assignments }
    }

    /// Adds an assignment (test and extraction plumbing).
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Number of half-day assignments.
    #[inline]
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the roster holds no assignments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// All assignments on one day.
    pub fn assignments_on(&self, day: NaiveDate) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.day == day).collect()
    }

    /// All assignments held by one physician.
    pub fn assignments_for_physician(&self, name: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.physician == name)
            .collect()
    }

    /// All assignments of one role.
    pub fn assignments_for_role(&self, role: Role) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.role == role).collect()
    }

    /// All assignments in one period across the calendar.
    pub fn assignments_in_period(&self, period: HalfDay) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.period == period)
            .collect()
    }

    /// Assignments matching a (day, period, role) slot.
    pub fn assignments_matching(
        &self,
        day: NaiveDate,
        period: HalfDay,
        role: Role,
    ) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.day == day && a.period == period && a.role == role)
            .collect()
    }

    /// Half-day counts per physician, in name order.
    pub fn counts_by_physician(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for a in &self.assignments {
            *counts.entry(a.physician.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Half-day counts per calendar day, in date order.
    pub fn counts_by_day(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for a in &self.assignments {
            *counts.entry(a.day).or_insert(0) += 1;
        }
        counts
    }

    /// First and last day carrying an assignment.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.assignments.iter().map(|a| a.day).min()?;
        let last = self.assignments.iter().map(|a| a.day).max()?;
        Some((first, last))
    }
}
