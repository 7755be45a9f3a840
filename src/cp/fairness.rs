//! FTE-proportional workload balance.
//!
//! For every working role, each physician owes a fair share of the
//! practice-wide annual target, proportional to their FTE. The stage
//! links a deviation variable to `actual − fair_share` and charges the
//! objective its absolute value through the usual pair of inequalities
//! (`penalty ≥ deviation`, `penalty ≥ −deviation`).
//!
//! Time-off roles and roles with no tracked target are left alone.

use crate::models::SchedulingInput;
use crate::solver::{Model, Relation};

use super::objective::ObjectiveBuilder;
use super::variables::VariableSpace;

pub(crate) fn apply(
    model: &mut Model,
    space: &VariableSpace,
    input: &SchedulingInput,
    fairness_weight: f64,
    objective: &mut ObjectiveBuilder,
) {
    let total_fte: f64 = input.physicians.iter().map(|p| p.fte).sum();
    let weight = fairness_weight.round() as i64;
    if total_fte <= 0.0 || weight <= 0 {
        return;
    }
    let slots = (input.calendar_days.len() * 2) as i64;

    for role in space.roles().iter().copied() {
        if role.is_time_off() {
            continue;
        }
        let total_units: f64 = input
            .physicians
            .iter()
            .map(|p| 2.0 * p.target_days(role))
            .sum();
        if total_units <= 0.0 {
            continue;
        }

        for (physician_index, physician) in input.physicians.iter().enumerate() {
            let fair = (total_units * physician.fte / total_fte).round() as i64;
            let vars = space.physician_role_vars(physician_index, role);

            // actual − deviation == fair, deviation ∈ [−fair, slots − fair]
            let deviation = model.new_int(-fair, slots - fair);
            model.add_linear(
                vars.iter().map(|&v| (v, 1)).chain([(deviation, -1)]),
                Relation::Eq,
                fair,
            );

            let penalty = model.new_int(0, fair.max((slots - fair).abs()));
            model.add_linear([(penalty, 1), (deviation, -1)], Relation::Ge, 0);
            model.add_linear([(penalty, 1), (deviation, 1)], Relation::Ge, 0);
            objective.add_penalty(penalty, weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{consecutive_days, Physician, Role, VacationCategory};
    use crate::solver::{BranchBoundSolver, CpSolver, SolverConfig};
    use chrono::NaiveDate;

    fn pair_input(fte_a: f64, fte_b: f64, dp_days: f64, calendar: usize) -> crate::models::SchedulingInput {
        let a = Physician::with_derived_budgets("Dr. Arnaud", fte_a, 0.0, 0.0, VacationCategory::Days25)
            .unwrap()
            .with_pathology_split([(Role::Dp, dp_days)]);
        let b = Physician::with_derived_budgets("Dr. Bello", fte_b, 0.0, 0.0, VacationCategory::Days25)
            .unwrap()
            .with_pathology_split([(Role::Dp, dp_days)]);
        crate::models::SchedulingInput::new()
            .with_physician(a)
            .with_physician(b)
            .with_calendar_days(consecutive_days(
                NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                calendar,
            ))
            .with_roles([Role::Dp])
    }

    #[test]
    fn test_penalty_is_absolute_deviation() {
        // Fair share is 2 half-days each; pin one physician to 1 and
        // the other to 2, and the optimum pays exactly |1 − 2|.
        let input = pair_input(1.0, 1.0, 1.0, 1);
        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        let mut objective = ObjectiveBuilder::new();
        apply(&mut model, &space, &input, 2.0, &mut objective);

        let a = space.physician_role_vars(0, Role::Dp);
        let b = space.physician_role_vars(1, Role::Dp);
        model.add_linear(a.iter().map(|&v| (v, 1)), Relation::Eq, 1);
        model.add_linear(b.iter().map(|&v| (v, 1)), Relation::Eq, 2);
        objective.install(&mut model);

        let solution = BranchBoundSolver::new().solve(&model, &SolverConfig::default());
        assert!(solution.has_solution());
        assert_eq!(solution.objective, Some(2)); // 1 unit short × weight 2
    }

    #[test]
    fn test_equal_ftes_share_equally() {
        // Total target 6 days = 12 units, fair share 6 each, but the
        // two-day calendar only offers 4 slots per head.
        let input = pair_input(1.0, 1.0, 3.0, 2);
        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        let mut objective = ObjectiveBuilder::new();
        apply(&mut model, &space, &input, 1.0, &mut objective);
        objective.install(&mut model);

        let solution = BranchBoundSolver::new().solve(&model, &SolverConfig::default());
        assert!(solution.has_solution());
        // Best effort: both work all 4 slots, each 2 units short.
        assert_eq!(solution.objective, Some(4));
        for physician in 0..2 {
            let worked: i64 = space
                .physician_role_vars(physician, Role::Dp)
                .iter()
                .map(|&v| solution.value(v).unwrap_or(0))
                .sum();
            assert_eq!(worked, 4);
        }
    }

    #[test]
    fn test_fair_share_follows_fte() {
        // FTEs 1.0 and 0.5: fair shares 8 and 4 of the 12 target
        // units. The half-timer can exactly meet theirs.
        let input = pair_input(1.0, 0.5, 3.0, 2);
        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        let mut objective = ObjectiveBuilder::new();
        apply(&mut model, &space, &input, 1.0, &mut objective);
        objective.install(&mut model);

        let solution = BranchBoundSolver::new().solve(&model, &SolverConfig::default());
        assert!(solution.has_solution());
        assert_eq!(solution.objective, Some(4));
        let half_timer: i64 = space
            .physician_role_vars(1, Role::Dp)
            .iter()
            .map(|&v| solution.value(v).unwrap_or(0))
            .sum();
        assert_eq!(half_timer, 4);
    }

    #[test]
    fn test_untracked_and_time_off_roles_skipped() {
        let a = Physician::with_derived_budgets("Dr. Arnaud", 1.0, 0.0, 0.0, VacationCategory::Days25)
            .unwrap();
        let input = crate::models::SchedulingInput::new()
            .with_physician(a)
            .with_calendar_days(consecutive_days(
                NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                2,
            ))
            // Admin target is zero at zero admin FTE; vacation is
            // time off despite its nonzero target.
            .with_roles([Role::Dp, Role::Admin, Role::Vacation]);

        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        let mut objective = ObjectiveBuilder::new();
        apply(&mut model, &space, &input, 1.0, &mut objective);

        // Only Dp earns rows: one link plus two absolute-value rows.
        assert_eq!(model.constraint_count(), 3);
        assert_eq!(objective.term_count(), 1);
    }
}
