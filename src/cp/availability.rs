//! Hard unavailability: declared days off pin every slot to zero.

use crate::models::{HalfDay, SchedulingInput};
use crate::solver::{Model, Relation};

use super::variables::VariableSpace;

/// Pins all role variables to zero on each physician's unavailable
/// dates. Dates outside the calendar are ignored.
pub(crate) fn apply(model: &mut Model, space: &VariableSpace, input: &SchedulingInput) {
    for (physician_index, physician) in input.physicians.iter().enumerate() {
        for date in &physician.unavailable_days {
            let Some(day) = input.day_index(*date) else {
                continue;
            };
            for period in HalfDay::ALL {
                let slot = space.slot_roles(physician_index, day, period);
                model.add_linear(slot.iter().map(|(_, v)| (*v, 1)), Relation::Eq, 0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{consecutive_days, Physician, Role, VacationCategory};
    use crate::solver::{BranchBoundSolver, CpSolver, SolverConfig};
    use chrono::NaiveDate;

    fn two_physician_input() -> crate::models::SchedulingInput {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let off = start.succ_opt().unwrap();
        let a = Physician::with_derived_budgets("Dr. Abebe", 1.0, 0.0, 0.0, VacationCategory::Days25)
            .unwrap()
            .with_unavailable_days([off]);
        let b = Physician::with_derived_budgets("Dr. Byrne", 1.0, 0.0, 0.0, VacationCategory::Days25)
            .unwrap();
        crate::models::SchedulingInput::new()
            .with_physician(a)
            .with_physician(b)
            .with_calendar_days(consecutive_days(start, 3))
            .with_roles([Role::Dp, Role::Osd])
    }

    #[test]
    fn test_one_row_per_blocked_period() {
        let input = two_physician_input();
        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        apply(&mut model, &space, &input);
        // One unavailable date, two periods.
        assert_eq!(model.constraint_count(), 2);
    }

    #[test]
    fn test_dates_off_calendar_are_ignored() {
        let mut input = two_physician_input();
        let stray = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        input.physicians[1] = input.physicians[1].clone().with_unavailable_days([stray]);

        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        apply(&mut model, &space, &input);
        assert_eq!(model.constraint_count(), 2);
    }

    #[test]
    fn test_blocked_day_gets_no_work() {
        let input = two_physician_input();
        let mut model = crate::solver::Model::new();
        let space = VariableSpace::create(&mut model, &input);
        apply(&mut model, &space, &input);

        // Demand one Dp unit on every day; only Dr. Byrne can take day 1.
        for day in 0..3 {
            let vars = space.day_role_vars(day, Role::Dp);
            model.add_linear(vars.iter().map(|&v| (v, 1)), Relation::Ge, 1);
        }

        let solution = BranchBoundSolver::new().solve(&model, &SolverConfig::default());
        assert!(solution.has_solution());

        for period in HalfDay::ALL {
            for (_, var) in space.slot_roles(0, 1, period) {
                assert_eq!(solution.value(var), Some(0));
            }
        }
        let byrne_day1: i64 = space
            .slot_roles(1, 1, HalfDay::Morning)
            .iter()
            .chain(space.slot_roles(1, 1, HalfDay::Afternoon).iter())
            .filter(|(role, _)| *role == Role::Dp)
            .map(|(_, var)| solution.value(*var).unwrap_or(0))
            .sum();
        assert!(byrne_day1 >= 1);
    }
}
