//! Scheduled-day-off allocation for part-time physicians.
//!
//! Part-timers owe the calendar a fixed number of SDO half-days
//! (derived from the uncommitted FTE fraction), and an SDO half-day
//! excludes every working role in the same slot. Full-timers get a
//! single row forcing their SDO count to zero.
//!
//! The annual SDO budget is used as-is even when it exceeds the
//! calendar; a short calendar therefore turns infeasible rather than
//! silently truncating the entitlement.

use crate::models::{half_day_units, HalfDay, Role, SchedulingInput};
use crate::solver::{Model, Relation};

use super::variables::VariableSpace;

pub(crate) fn apply(model: &mut Model, space: &VariableSpace, input: &SchedulingInput) {
    if space.role_index(Role::Sdo).is_none() {
        return;
    }

    for (physician_index, physician) in input.physicians.iter().enumerate() {
        let sdo_vars = space.physician_role_vars(physician_index, Role::Sdo);

        if physician.is_full_time() {
            model.add_linear(sdo_vars.iter().map(|&v| (v, 1)), Relation::Eq, 0);
            continue;
        }

        let units = half_day_units(physician.budgets.sdo);
        model.add_linear(sdo_vars.iter().map(|&v| (v, 1)), Relation::Eq, units);

        for day in 0..input.calendar_days.len() {
            for period in HalfDay::ALL {
                let slot = space.slot_roles(physician_index, day, period);
                let Some(&(_, sdo)) = slot.iter().find(|(role, _)| *role == Role::Sdo) else {
                    continue;
                };
                for (role, var) in &slot {
                    if *role == Role::Sdo {
                        continue;
                    }
                    // work ≤ 1 − sdo
                    model.add_linear([(*var, 1), (sdo, 1)], Relation::Le, 1);
                }
            }
        }
    }
}
