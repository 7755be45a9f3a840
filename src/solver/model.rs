//! Integer-linear model and the engine boundary.
//!
//! The formulation layer builds a [`Model`] — integer variables with
//! finite domains plus linear rows — and hands it to any [`CpSolver`]
//! implementation. The model is plain data: it can be inspected,
//! counted, and asserted on without solving, which the constraint
//! tests rely on.
//!
//! # Reference
//! Williams (2013), "Model Building in Mathematical Programming"

use std::fmt;
use std::time::Duration;

/// Handle to one model variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(u32);

impl VarId {
    /// Position of the variable in the model.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Comparison direction of a linear row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Left side at most the bound.
    Le,
    /// Left side at least the bound.
    Ge,
    /// Left side exactly the bound.
    Eq,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "==",
        })
    }
}

/// A weighted sum of variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    terms: Vec<(VarId, i64)>,
}

impl LinExpr {
    /// Creates an empty expression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit-coefficient sum of the given variables.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1)).collect(),
        }
    }

    /// Builder: appends one weighted term.
    pub fn plus(mut self, var: VarId, coefficient: i64) -> Self {
        self.add(var, coefficient);
        self
    }

    /// Appends one weighted term.
    pub fn add(&mut self, var: VarId, coefficient: i64) {
        self.terms.push((var, coefficient));
    }

    /// The terms in insertion order.
    #[inline]
    pub fn terms(&self) -> &[(VarId, i64)] {
        &self.terms
    }

    /// Whether the expression has no terms.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// One linear row: `terms relation rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Weighted variable terms on the left side.
    pub terms: Vec<(VarId, i64)>,
    /// Comparison direction.
    pub relation: Relation,
    /// Right-hand bound.
    pub rhs: i64,
}

/// An integer-linear model under construction.
#[derive(Debug, Clone, Default)]
pub struct Model {
    lower: Vec<i64>,
    upper: Vec<i64>,
    constraints: Vec<LinearConstraint>,
    objective: Option<LinExpr>,
}

impl Model {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a 0/1 variable.
    pub fn new_bool(&mut self) -> VarId {
        self.new_int(0, 1)
    }

    /// Adds an integer variable with an inclusive domain.
    pub fn new_int(&mut self, lower: i64, upper: i64) -> VarId {
        let id = VarId(self.lower.len() as u32);
        self.lower.push(lower);
        self.upper.push(upper);
        id
    }

    /// Adds a linear row.
    pub fn add_linear(
        &mut self,
        terms: impl IntoIterator<Item = (VarId, i64)>,
        relation: Relation,
        rhs: i64,
    ) {
        self.constraints.push(LinearConstraint {
            terms: terms.into_iter().collect(),
            relation,
            rhs,
        });
    }

    /// Directs the engine to minimize the given expression.
    pub fn minimize(&mut self, objective: LinExpr) {
        self.objective = Some(objective);
    }

    /// The minimize expression, if one was set.
    #[inline]
    pub fn objective(&self) -> Option<&LinExpr> {
        self.objective.as_ref()
    }

    /// Number of variables.
    #[inline]
    pub fn var_count(&self) -> usize {
        self.lower.len()
    }

    /// Number of linear rows.
    #[inline]
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// All rows, in insertion order.
    #[inline]
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Domain of one variable.
    #[inline]
    pub fn bounds(&self, var: VarId) -> (i64, i64) {
        (self.lower[var.index()], self.upper[var.index()])
    }

    /// Initial lower bounds, indexed by variable.
    pub(crate) fn lower_bounds(&self) -> &[i64] {
        &self.lower
    }

    /// Initial upper bounds, indexed by variable.
    pub(crate) fn upper_bounds(&self) -> &[i64] {
        &self.upper
    }

    /// Structural defect, if the model is malformed.
    ///
    /// Engines report such models as [`SolveStatus::Invalid`] instead
    /// of attempting a search.
    pub fn structural_defect(&self) -> Option<String> {
        for (i, (lo, hi)) in self.lower.iter().zip(&self.upper).enumerate() {
            if lo > hi {
                return Some(format!("variable {i} has inverted domain [{lo}, {hi}]"));
            }
        }
        let in_range = |terms: &[(VarId, i64)]| {
            terms
                .iter()
                .find(|(v, _)| v.index() >= self.lower.len())
                .map(|(v, _)| v.index())
        };
        for (row, c) in self.constraints.iter().enumerate() {
            if let Some(v) = in_range(&c.terms) {
                return Some(format!("row {row} references unknown variable {v}"));
            }
        }
        if let Some(obj) = &self.objective {
            if let Some(v) = in_range(obj.terms()) {
                return Some(format!("objective references unknown variable {v}"));
            }
        }
        None
    }
}

/// Terminal status of one solve invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// A solution was found and proven optimal (or the model was a
    /// satisfaction problem and a solution was found).
    Optimal,
    /// A solution was found but optimality was not proven in time.
    Feasible,
    /// The constraints admit no solution.
    Infeasible,
    /// The model is structurally malformed.
    Invalid,
    /// The engine stopped without a verdict.
    Unknown,
}

impl SolveStatus {
    /// Whether variable values are available.
    #[inline]
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Feasible => "feasible",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Invalid => "invalid",
            SolveStatus::Unknown => "unknown",
        })
    }
}

/// Search effort counters for one solve invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Wall-clock time spent in the engine.
    pub wall_time: Duration,
    /// Branching decisions taken.
    pub branches: u64,
    /// Dead ends hit (propagation failures and bound prunes).
    pub conflicts: u64,
}

/// Result of one solve invocation.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Terminal status.
    pub status: SolveStatus,
    values: Vec<i64>,
    /// Objective value at the returned solution, if any.
    pub objective: Option<i64>,
    /// Search effort counters.
    pub stats: SolveStats,
}

impl Solution {
    /// Packs an engine verdict.
    ///
    /// `values` must be indexed by variable and is expected to be
    /// empty unless `status` carries a solution.
    pub fn new(
        status: SolveStatus,
        values: Vec<i64>,
        objective: Option<i64>,
        stats: SolveStats,
    ) -> Self {
        Self {
            status,
            values,
            objective,
            stats,
        }
    }

    /// Verdict without values (infeasible, invalid, unknown).
    pub fn without_values(status: SolveStatus, stats: SolveStats) -> Self {
        Self::new(status, Vec::new(), None, stats)
    }

    /// Whether variable values are available.
    #[inline]
    pub fn has_solution(&self) -> bool {
        self.status.has_solution()
    }

    /// Value of one variable, when the status carries a solution.
    pub fn value(&self, var: VarId) -> Option<i64> {
        if !self.has_solution() {
            return None;
        }
        self.values.get(var.index()).copied()
    }
}

/// Engine knobs shared by all implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Hard deadline for one solve invocation.
    pub time_limit: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(120),
        }
    }
}

impl SolverConfig {
    /// Builder: sets the deadline.
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }
}

/// A constraint engine.
///
/// Implementations own the search strategy; the formulation layer
/// only depends on this trait.
pub trait CpSolver {
    /// Solves the model within the configured limits.
    fn solve(&self, model: &Model, config: &SolverConfig) -> Solution;
}
