//! Annual-target rows tying calendar work to derived budgets.
//!
//! For each physician, role groups must hit their annual budget
//! exactly (in half-day units): total work excluding SDO, the
//! pathology category, clinic duty (OSD alone), outside-service duty
//! (OSD plus NVC), NVC alone, administration, and SDO. Trip and
//! vacation are capped instead, since both may legitimately fall
//! short of the entitlement within one planning year. Research has
//! no row at all; it absorbs whatever the caps leave unused, which
//! keeps budgets derived from the FTE formulas satisfiable.
//!
//! Role groups are intersected with the input scope; a group with no
//! in-scope role is skipped.

use crate::models::{half_day_units, Role, RoleCategory, SchedulingInput};
use crate::solver::{Model, Relation, VarId};

use super::variables::VariableSpace;

pub(crate) fn apply(model: &mut Model, space: &VariableSpace, input: &SchedulingInput) {
    for (physician_index, physician) in input.physicians.iter().enumerate() {
        let budgets = &physician.budgets;

        let total_work: Vec<Role> = space
            .roles()
            .iter()
            .copied()
            .filter(|role| *role != Role::Sdo)
            .collect();
        let pathology: Vec<Role> = RoleCategory::Pathology.roles().collect();

        let groups: [(&[Role], f64); 7] = [
            (&total_work, budgets.workdays),
            (&pathology, budgets.pathology),
            (&[Role::Osd], budgets.clinical),
            (&[Role::Osd, Role::Nvc], budgets.osd),
            (&[Role::Nvc], budgets.nvc),
            (&[Role::Admin], budgets.admin),
            (&[Role::Sdo], budgets.sdo),
        ];
        for (roles, days) in groups {
            let vars: Vec<VarId> = roles
                .iter()
                .flat_map(|&role| space.physician_role_vars(physician_index, role))
                .collect();
            if vars.is_empty() {
                continue;
            }
            model.add_linear(
                vars.iter().map(|&v| (v, 1)),
                Relation::Eq,
                half_day_units(days),
            );
        }

        let trip = space.physician_role_vars(physician_index, Role::Trip);
        if !trip.is_empty() {
            model.add_linear(
                trip.iter().map(|&v| (v, 1)),
                Relation::Le,
                half_day_units(budgets.trip),
            );
        }
        let vacation = space.physician_role_vars(physician_index, Role::Vacation);
        if !vacation.is_empty() {
            model.add_linear(
                vacation.iter().map(|&v| (v, 1)),
                Relation::Le,
                half_day_units(budgets.vacation),
            );
        }
    }
}
