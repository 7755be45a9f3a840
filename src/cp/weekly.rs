//! Practice-wide weekly throughput rules.
//!
//! A rule demands `half_days_per_week` units of one role, summed over
//! every physician, for each week of the calendar. Required rules
//! become hard floors. Preferred rules introduce a shortfall variable
//! (`penalty ≥ demanded − actual`, `penalty ≥ 0`) that feeds the
//! objective at the preference weight, integer-scaled by 100 so
//! fractional weights survive the integer objective.

use tracing::debug;

use crate::models::SchedulingInput;
use crate::solver::{Model, Relation};

use super::objective::ObjectiveBuilder;
use super::variables::VariableSpace;
use super::{Enforcement, WeeklyRule};

pub(crate) fn apply(
    model: &mut Model,
    space: &VariableSpace,
    input: &SchedulingInput,
    rules: &[WeeklyRule],
    preference_weight: f64,
    objective: &mut ObjectiveBuilder,
) {
    let weeks = input.week_count() as i64;

    for rule in rules {
        let vars = (0..input.physicians.len())
            .flat_map(|p| space.physician_role_vars(p, rule.role))
            .collect::<Vec<_>>();
        if vars.is_empty() {
            debug!(role = %rule.role, "weekly rule skipped, role out of scope");
            continue;
        }

        let demanded = rule.half_days_per_week * weeks;
        match rule.enforcement {
            Enforcement::Required => {
                model.add_linear(vars.iter().map(|&v| (v, 1)), Relation::Ge, demanded);
            }
            Enforcement::Preferred => {
                let shortfall = model.new_int(0, demanded.max(0));
                model.add_linear(
                    vars.iter().map(|&v| (v, 1)).chain([(shortfall, 1)]),
                    Relation::Ge,
                    demanded,
                );
                let weight = (preference_weight * 100.0).round() as i64;
                objective.add_penalty(shortfall, weight);
            }
        }
    }
}
