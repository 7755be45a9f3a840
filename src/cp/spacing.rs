//! Temporal spacing rewards for repeat-heavy duties.
//!
//! Duties like the physician-of-the-day rotation read better spread
//! out than clustered. For each configured role and physician the
//! stage builds, per slot pair, an AND indicator (both slots taken)
//! and a conditional day distance:
//!
//! - `both ≤ a`, `both ≤ b`, `both ≥ a + b − 1`,
//! - `dist ≥ raw − M·(1 − both)` and `dist ≤ raw + M·(1 − both)`,
//!   with `dist ∈ [0, M]` and `M` the calendar length,
//!
//! so `dist` equals the real day gap when both slots are taken and
//! floats up to `M` otherwise. A minimum-distance variable sits below
//! every pair distance and enters the objective negated, which turns
//! minimization into a reward for keeping the closest pair far apart.

use crate::models::{Role, SchedulingInput};
use crate::solver::{Model, Relation, VarId};

use super::objective::ObjectiveBuilder;
use super::variables::VariableSpace;

pub(crate) fn apply(
    model: &mut Model,
    space: &VariableSpace,
    input: &SchedulingInput,
    spacing_weight: f64,
    spacing_roles: &std::collections::BTreeMap<Role, f64>,
    objective: &mut ObjectiveBuilder,
) {
    let big_m = input.calendar_days.len() as i64;
    if big_m == 0 {
        return;
    }

    for (&role, &role_weight) in spacing_roles {
        let weight = (role_weight * spacing_weight).round() as i64;
        if weight <= 0 || space.role_index(role).is_none() {
            continue;
        }

        for physician in 0..input.physicians.len() {
            let slots: Vec<(i64, VarId)> = space
                .slots()
                .filter(|s| s.physician == physician && s.role == role)
                .map(|s| (s.day as i64, s.var))
                .collect();
            if slots.len() < 2 {
                continue;
            }

            let mut distances = Vec::new();
            for i in 0..slots.len() {
                for j in (i + 1)..slots.len() {
                    let (day_a, a) = slots[i];
                    let (day_b, b) = slots[j];
                    let raw = (day_b - day_a).abs();

                    let both = model.new_bool();
                    model.add_linear([(both, 1), (a, -1)], Relation::Le, 0);
                    model.add_linear([(both, 1), (b, -1)], Relation::Le, 0);
                    model.add_linear([(a, 1), (b, 1), (both, -1)], Relation::Le, 1);

                    let dist = model.new_int(0, big_m);
                    model.add_linear([(dist, 1), (both, -big_m)], Relation::Ge, raw - big_m);
                    model.add_linear([(dist, 1), (both, big_m)], Relation::Le, raw + big_m);
                    distances.push(dist);
                }
            }

            let min_dist = model.new_int(0, big_m);
            for &dist in &distances {
                model.add_linear([(min_dist, 1), (dist, -1)], Relation::Le, 0);
            }
            objective.add_reward(min_dist, weight);
        }
    }
}
