//! Role-exclusivity rules within a single half-day slot.
//!
//! A physician holds at most one role per half-day, with one carve-out:
//! the combinable departmental duties (`Role::COMBINABLE`) may stack
//! inside the pathology category. The stage links each category to an
//! auxiliary "active" boolean and caps the active booleans at one, so
//! stacking never crosses a category boundary.
//!
//! Per slot:
//! - sum of non-combinable role variables ≤ 1,
//! - for each category `c`: `Σ vars(c) ≤ |c| · active(c)` and
//!   `Σ vars(c) ≥ active(c)`,
//! - `Σ active(c) ≤ 1`.

use std::collections::BTreeMap;

use crate::models::{HalfDay, RoleCategory, SchedulingInput};
use crate::solver::{Model, Relation, VarId};

use super::variables::VariableSpace;

pub(crate) fn apply(model: &mut Model, space: &VariableSpace, input: &SchedulingInput) {
    for physician in 0..input.physicians.len() {
        for day in 0..input.calendar_days.len() {
            for period in HalfDay::ALL {
                apply_slot(model, space, physician, day, period);
            }
        }
    }
}

fn apply_slot(
    model: &mut Model,
    space: &VariableSpace,
    physician: usize,
    day: usize,
    period: HalfDay,
) {
    let slot = space.slot_roles(physician, day, period);

    let non_combinable: Vec<VarId> = slot
        .iter()
        .filter(|(role, _)| !role.is_combinable())
        .map(|(_, var)| *var)
        .collect();
    if non_combinable.len() > 1 {
        model.add_linear(non_combinable.iter().map(|&v| (v, 1)), Relation::Le, 1);
    }

    let mut by_category: BTreeMap<RoleCategory, Vec<VarId>> = BTreeMap::new();
    for (role, var) in &slot {
        by_category.entry(role.category()).or_default().push(*var);
    }

    let mut actives = Vec::with_capacity(by_category.len());
    for (_, members) in by_category {
        let active = model.new_bool();
        let width = members.len() as i64;
        // Σ members − width·active ≤ 0
        model.add_linear(
            members
                .iter()
                .map(|&v| (v, 1))
                .chain([(active, -width)]),
            Relation::Le,
            0,
        );
        // Σ members − active ≥ 0
        model.add_linear(
            members.iter().map(|&v| (v, 1)).chain([(active, -1)]),
            Relation::Ge,
            0,
        );
        actives.push(active);
    }

    if actives.len() > 1 {
        model.add_linear(actives.iter().map(|&v| (v, 1)), Relation::Le, 1);
    }
}
