//! Daily staffing floors and duty bundling.
//!
//! Three institutional rules plus a generic per-role window:
//! - at least one IMF generalist half-day per day,
//! - at least five departmental-physician (DP) half-days per day,
//! - exactly one departmental physician of the day (DPD) per period,
//! - optional per-role min/max half-day counts from the input.
//!
//! On weekday afternoons the DPD slot is bundled with the education
//! duty (DPED), and additionally with the working-group duty (DPWG)
//! on the configured triplet weekdays, by forcing the role variables
//! of each physician pairwise equal.

use chrono::Datelike;

use crate::models::{HalfDay, Role, SchedulingInput};
use crate::solver::{Model, Relation};

use super::variables::VariableSpace;
use super::CoveragePolicy;

pub(crate) fn apply(
    model: &mut Model,
    space: &VariableSpace,
    input: &SchedulingInput,
    policy: &CoveragePolicy,
) {
    for day in 0..input.calendar_days.len() {
        if policy.generalist_min_per_day > 0 {
            let vars = space.day_role_vars(day, Role::Imf);
            if !vars.is_empty() {
                model.add_linear(
                    vars.iter().map(|&v| (v, 1)),
                    Relation::Ge,
                    policy.generalist_min_per_day,
                );
            }
        }

        if policy.core_min_per_day > 0 {
            let vars = space.day_role_vars(day, Role::Dp);
            if !vars.is_empty() {
                model.add_linear(
                    vars.iter().map(|&v| (v, 1)),
                    Relation::Ge,
                    policy.core_min_per_day,
                );
            }
        }

        if space.role_index(Role::Dpd).is_some() {
            for period in HalfDay::ALL {
                let vars = space.period_role_vars(day, period, Role::Dpd);
                model.add_linear(
                    vars.iter().map(|&v| (v, 1)),
                    Relation::Eq,
                    policy.person_of_day_per_period,
                );
            }
        }

        for (role, requirement) in &input.coverage_requirements {
            let vars = space.day_role_vars(day, *role);
            if vars.is_empty() {
                continue;
            }
            if requirement.min_physicians > 0 {
                model.add_linear(
                    vars.iter().map(|&v| (v, 1)),
                    Relation::Ge,
                    requirement.min_physicians,
                );
            }
            if let Some(max) = requirement.max_physicians {
                model.add_linear(vars.iter().map(|&v| (v, 1)), Relation::Le, max);
            }
        }

        let weekday = input.calendar_days[day].weekday();
        if weekday.number_from_monday() <= 5 {
            bundle_afternoon(model, space, day, Role::Dped);
            if policy.triplet_weekdays.contains(&weekday) {
                bundle_afternoon(model, space, day, Role::Dpwg);
            }
        }
    }
}

/// Ties each physician's afternoon DPD variable to a companion duty.
fn bundle_afternoon(model: &mut Model, space: &VariableSpace, day: usize, companion: Role) {
    for physician in 0..space.physician_count() {
        let (Some(lead), Some(mate)) = (
            space.var(physician, day, HalfDay::Afternoon, Role::Dpd),
            space.var(physician, day, HalfDay::Afternoon, companion),
        ) else {
            continue;
        };
        model.add_linear([(lead, 1), (mate, -1)], Relation::Eq, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{consecutive_days, CoverageRequirement, Physician, VacationCategory};
    use crate::solver::{BranchBoundSolver, CpSolver, SolverConfig};
    use chrono::NaiveDate;

    fn trio_input(start: NaiveDate, days: usize) -> crate::models::SchedulingInput {
        let mut input = crate::models::SchedulingInput::new()
            .with_calendar_days(consecutive_days(start, days))
            .with_roles([Role::Imf, Role::Dp, Role::Dpd, Role::Dped, Role::Dpwg]);
        for name in ["Dr. Adeyemi", "Dr. Brandt", "Dr. Chen"] {
            let physician =
                Physician::with_derived_budgets(name, 1.0, 0.0, 0.0, VacationCategory::Days25)
                    .unwrap();
            input = input.with_physician(physician);
        }
        input
    }

    #[test]
    fn test_rows_on_a_monday() {
        // 2024-03-04 is a Monday: no working-group bundling.
        let input = trio_input(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), 1);
        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        apply(&mut model, &space, &input, &CoveragePolicy::default());

        // IMF floor + DP floor + 2 DPD rows + 3 education bundles.
        assert_eq!(model.constraint_count(), 1 + 1 + 2 + 3);
    }

    #[test]
    fn test_rows_on_a_triplet_day() {
        // 2024-03-05 is a Tuesday: working-group bundling joins in.
        let input = trio_input(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), 1);
        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        apply(&mut model, &space, &input, &CoveragePolicy::default());

        assert_eq!(model.constraint_count(), 1 + 1 + 2 + 3 + 3);
    }

    #[test]
    fn test_weekend_has_no_bundles() {
        // 2024-03-09 is a Saturday.
        let input = trio_input(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(), 1);
        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        apply(&mut model, &space, &input, &CoveragePolicy::default());

        assert_eq!(model.constraint_count(), 1 + 1 + 2);
    }

    #[test]
    fn test_bundle_skipped_when_companion_out_of_scope() {
        // DPED out of scope: Monday keeps its floors and DPD rows but
        // gains no bundle rows for any physician.
        let mut input = trio_input(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), 1);
        input = input.with_roles([Role::Imf, Role::Dp, Role::Dpd]);

        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        apply(&mut model, &space, &input, &CoveragePolicy::default());

        assert_eq!(model.constraint_count(), 1 + 1 + 2);
    }

    #[test]
    fn test_triplet_roles_move_together() {
        let input = trio_input(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), 1);
        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        apply(&mut model, &space, &input, &CoveragePolicy::default());

        let solution = BranchBoundSolver::new().solve(&model, &SolverConfig::default());
        assert!(solution.has_solution());

        // Daily floors hold.
        let imf: i64 = space
            .day_role_vars(0, Role::Imf)
            .iter()
            .map(|&v| solution.value(v).unwrap_or(0))
            .sum();
        assert!(imf >= 1);
        let dp: i64 = space
            .day_role_vars(0, Role::Dp)
            .iter()
            .map(|&v| solution.value(v).unwrap_or(0))
            .sum();
        assert!(dp >= 5);

        // Exactly one DPD per period.
        for period in HalfDay::ALL {
            let dpd: i64 = space
                .period_role_vars(0, period, Role::Dpd)
                .iter()
                .map(|&v| solution.value(v).unwrap_or(0))
                .sum();
            assert_eq!(dpd, 1);
        }

        // Afternoon DPD, DPED and DPWG agree per physician.
        for physician in 0..3 {
            let dpd = space.var(physician, 0, HalfDay::Afternoon, Role::Dpd).unwrap();
            let dped = space.var(physician, 0, HalfDay::Afternoon, Role::Dped).unwrap();
            let dpwg = space.var(physician, 0, HalfDay::Afternoon, Role::Dpwg).unwrap();
            assert_eq!(solution.value(dpd), solution.value(dped));
            assert_eq!(solution.value(dpd), solution.value(dpwg));
        }
    }

    #[test]
    fn test_generic_window_bounds_daily_count() {
        let mut input = trio_input(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), 2);
        input = input
            .with_roles([Role::Imf, Role::Dp, Role::Osd])
            .with_coverage(Role::Osd, CoverageRequirement::between(1, 2));

        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        apply(&mut model, &space, &input, &CoveragePolicy::default());

        let solution = BranchBoundSolver::new().solve(&model, &SolverConfig::default());
        assert!(solution.has_solution());
        for day in 0..2 {
            let osd: i64 = space
                .day_role_vars(day, Role::Osd)
                .iter()
                .map(|&v| solution.value(v).unwrap_or(0))
                .sum();
            assert!((1..=2).contains(&osd));
        }
    }
}
