//! Input validation for rostering problems.
//!
//! Checks structural integrity of the scheduling input before any
//! model is built. Detects:
//! - Empty physician, calendar, or role collections
//! - Blank or duplicate physician names
//! - FTE fractions outside `0.0..=1.0` or overcommitted splits
//! - Stored budgets that disagree with the FTE-derived formulas
//! - Duplicate calendar days and duplicate scope roles
//! - In-scope roles with no coverage requirement
//! - Coverage requirements that are malformed or aim at roles
//!   outside the scope
//!
//! All findings are aggregated; a caller sees every problem in one
//! pass instead of fixing them one at a time.

use std::collections::HashSet;

use crate::models::{
    SchedulingInput, BUDGET_TOLERANCE_DAYS, FTE_TOLERANCE, TRIP_DAYS_PER_YEAR,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required collection is empty.
    EmptyInput,
    /// A physician has a blank name.
    EmptyName,
    /// Two physicians share a name.
    DuplicateName,
    /// An FTE fraction is out of range or overcommitted.
    InvalidFte,
    /// A stored budget disagrees with its derivation.
    InvalidBudget,
    /// The calendar lists the same day twice.
    DuplicateDay,
    /// The role scope lists the same role twice.
    DuplicateRole,
    /// An in-scope role has no coverage requirement.
    MissingCoverage,
    /// A coverage requirement is malformed or out of scope.
    InvalidCoverage,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a scheduling input.
///
/// Checks:
/// 1. At least one physician, one calendar day, and one role
/// 2. Physician names are non-blank and unique
/// 3. Every FTE fraction lies in `0.0..=1.0`, the total FTE is
///    positive, and admin plus research stays within the total
/// 4. Stored budgets match their FTE derivation (trip pinned at 18
///    days, the rest within half a day of the formulas)
/// 5. No duplicate calendar days, no duplicate scope roles
/// 6. Every in-scope role carries a coverage requirement, and every
///    requirement has sane bounds and targets an in-scope role
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected
/// issues.
pub fn validate_input(input: &SchedulingInput) -> ValidationResult {
    let mut errors = Vec::new();

    if input.physicians.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "No physicians to roster",
        ));
    }
    if input.calendar_days.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "Calendar has no days",
        ));
    }
    if input.roles.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "Role scope is empty",
        ));
    }

    let mut names = HashSet::new();
    for physician in &input.physicians {
        if physician.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                "Physician with blank name",
            ));
        } else if !names.insert(physician.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate physician name: {}", physician.name),
            ));
        }

        for (field, value) in [
            ("total", physician.fte),
            ("admin", physician.admin_fte),
            ("research", physician.research_fte),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidFte,
                    format!(
                        "Physician '{}': {field} FTE {value} outside 0.0..=1.0",
                        physician.name
                    ),
                ));
            }
        }
        if physician.fte <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidFte,
                format!("Physician '{}': total FTE must be positive", physician.name),
            ));
        }
        let committed = physician.admin_fte + physician.research_fte;
        if committed > physician.fte + FTE_TOLERANCE {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidFte,
                format!(
                    "Physician '{}': admin + research FTE {committed:.3} exceeds total {:.3}",
                    physician.name, physician.fte
                ),
            ));
        }

        if (physician.budgets.trip - TRIP_DAYS_PER_YEAR).abs() > BUDGET_TOLERANCE_DAYS {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidBudget,
                format!(
                    "Physician '{}': trip budget {} differs from the fixed {} days",
                    physician.name, physician.budgets.trip, TRIP_DAYS_PER_YEAR
                ),
            ));
        }
        for finding in physician.validate_budgets() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidBudget,
                format!("Physician '{}': {finding}", physician.name),
            ));
        }
    }

    let mut days = HashSet::new();
    for day in &input.calendar_days {
        if !days.insert(day) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateDay,
                format!("Calendar lists {day} twice"),
            ));
        }
    }

    let mut roles = HashSet::new();
    for role in &input.roles {
        if !roles.insert(role) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateRole,
                format!("Role scope lists {role} twice"),
            ));
        }
        if !input.coverage_requirements.contains_key(role) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingCoverage,
                format!("No coverage requirement for in-scope role {role}"),
            ));
        }
    }

    for (role, requirement) in &input.coverage_requirements {
        if !input.has_role(*role) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCoverage,
                format!("Coverage requirement for {role}, which is not in scope"),
            ));
        }
        if requirement.min_physicians < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCoverage,
                format!("Coverage for {role}: negative minimum"),
            ));
        }
        if let Some(max) = requirement.max_physicians {
            if max < requirement.min_physicians {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidCoverage,
                    format!(
                        "Coverage for {role}: maximum {max} below minimum {}",
                        requirement.min_physicians
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        consecutive_days, CoverageRequirement, Physician, Role, VacationCategory,
    };
    use chrono::NaiveDate;

    fn sample_input() -> SchedulingInput {
        let a = Physician::with_derived_budgets("Dr. Haddad", 1.0, 0.1, 0.0, VacationCategory::Days30)
            .unwrap();
        let b = Physician::with_derived_budgets("Dr. Iwu", 0.8, 0.0, 0.1, VacationCategory::Days25)
            .unwrap();
        SchedulingInput::new()
            .with_physician(a)
            .with_physician(b)
            .with_calendar_days(consecutive_days(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                14,
            ))
            .with_roles([Role::Imf, Role::Dp, Role::Dpd, Role::Osd, Role::Sdo])
            .with_loose_coverage()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_input()).is_ok());
    }

    #[test]
    fn test_empty_collections() {
        let input = SchedulingInput::new();
        let errors = validate_input(&input).unwrap_err();
        let empties = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::EmptyInput)
            .count();
        assert_eq!(empties, 3);
    }

    #[test]
    fn test_duplicate_physician_name() {
        let mut input = sample_input();
        let twin = input.physicians[0].clone();
        input = input.with_physician(twin);

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateName));
    }

    #[test]
    fn test_blank_name() {
        let mut input = sample_input();
        input.physicians[0].name = "   ".to_string();

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptyName));
    }

    #[test]
    fn test_tampered_fte() {
        let mut input = sample_input();
        input.physicians[0].fte = 1.4;

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidFte));
    }

    #[test]
    fn test_overcommitted_fte() {
        let mut input = sample_input();
        input.physicians[1].admin_fte = 0.9; // 0.9 + 0.1 > 0.8

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidFte
                && e.message.contains("exceeds total")));
    }

    #[test]
    fn test_tampered_budget() {
        let mut input = sample_input();
        input.physicians[0].budgets.vacation += 2.0;

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidBudget));
    }

    #[test]
    fn test_tampered_trip_budget() {
        let mut input = sample_input();
        input.physicians[0].budgets.trip = 24.0;

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidBudget
                && e.message.contains("trip")));
    }

    #[test]
    fn test_duplicate_day() {
        let mut input = sample_input();
        let first = input.calendar_days[0];
        input.calendar_days.push(first);

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateDay));
    }

    #[test]
    fn test_duplicate_role() {
        let mut input = sample_input();
        input.roles.push(Role::Dp);

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateRole));
    }

    #[test]
    fn test_missing_coverage_for_scoped_role() {
        let mut input = sample_input();
        input.coverage_requirements.remove(&Role::Dpd);

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MissingCoverage
                && e.message.contains("dpd")));
    }

    #[test]
    fn test_out_of_scope_coverage() {
        let input = sample_input().with_coverage(Role::Nvc, CoverageRequirement::at_least(1));

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCoverage));
    }

    #[test]
    fn test_inverted_coverage_window() {
        let input = sample_input().with_coverage(Role::Dp, CoverageRequirement::between(3, 1));

        let errors = validate_input(&input).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCoverage
                && e.message.contains("below minimum")));
    }

    #[test]
    fn test_multiple_errors_aggregate() {
        let mut input = sample_input();
        input.physicians[0].fte = -0.2;
        input.roles.push(Role::Imf);

        let errors = validate_input(&input).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
