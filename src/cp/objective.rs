//! Objective assembly.
//!
//! Stages deposit weighted penalty and reward terms here; `install`
//! folds them into a single bounded objective variable tied to the
//! weighted sum by an equality row, then asks the model to minimize
//! that variable. With no terms the model is left without an
//! objective and solving degrades to pure satisfaction.

use crate::solver::{LinExpr, Model, Relation, VarId};

/// Collects weighted objective terms across compiler stages.
#[derive(Debug, Default)]
pub struct ObjectiveBuilder {
    terms: Vec<(VarId, i64)>,
}

impl ObjectiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cost term: larger values of `var` cost more.
    pub fn add_penalty(&mut self, var: VarId, weight: i64) {
        if weight != 0 {
            self.terms.push((var, weight));
        }
    }

    /// Adds a reward term: larger values of `var` are preferred.
    pub fn add_reward(&mut self, var: VarId, weight: i64) {
        if weight != 0 {
            self.terms.push((var, -weight));
        }
    }

    /// Whether any term has been collected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of collected terms.
    #[inline]
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Ties the collected terms to a fresh objective variable and
    /// installs it as the minimization target. Returns the objective
    /// variable, or `None` when there is nothing to optimize.
    pub fn install(self, model: &mut Model) -> Option<VarId> {
        if self.terms.is_empty() {
            return None;
        }

        let mut bound: i64 = 0;
        for &(var, weight) in &self.terms {
            let (lo, hi) = model.bounds(var);
            bound = bound.saturating_add(weight.abs().saturating_mul(lo.abs().max(hi.abs())));
        }

        let objective = model.new_int(-bound, bound);
        model.add_linear(
            self.terms
                .iter()
                .copied()
                .chain([(objective, -1)]),
            Relation::Eq,
            0,
        );
        model.minimize(LinExpr::sum([objective]));
        Some(objective)
    }
}
