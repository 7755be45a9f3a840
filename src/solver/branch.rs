//! Reference branch-and-bound engine.
//!
//! Depth-first search over integer domains with bounds-consistency
//! propagation on every linear row, incumbent pruning against the
//! objective lower bound, and a hard wall-clock deadline. Small and
//! deterministic rather than clever: the formulation layer treats any
//! [`CpSolver`] as a black box, and this one exists so the crate is
//! solvable out of the box.
//!
//! # Reference
//! - Land & Doig (1960), "An automatic method of solving discrete
//!   programming problems"
//! - Apt (2003), "Principles of Constraint Programming", Ch. 6

use std::time::Instant;

use tracing::debug;

use super::model::{
    CpSolver, Model, Relation, Solution, SolveStats, SolveStatus, SolverConfig,
};

/// The in-crate engine. Stateless; construct freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchBoundSolver;

impl BranchBoundSolver {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for BranchBoundSolver {
    fn solve(&self, model: &Model, config: &SolverConfig) -> Solution {
        let start = Instant::now();

        if let Some(defect) = model.structural_defect() {
            debug!(%defect, "rejecting malformed model");
            let stats = SolveStats {
                wall_time: start.elapsed(),
                ..SolveStats::default()
            };
            return Solution::without_values(SolveStatus::Invalid, stats);
        }

        let mut search = Search::new(model, start, config);
        search.dfs();

        let stats = SolveStats {
            wall_time: start.elapsed(),
            branches: search.branches,
            conflicts: search.conflicts,
        };
        match (search.best_values.take(), search.timed_out) {
            (Some(values), timed_out) => {
                let status = if timed_out {
                    SolveStatus::Feasible
                } else {
                    SolveStatus::Optimal
                };
                let objective = search.has_objective.then_some(search.best_objective);
                debug!(
                    %status,
                    branches = stats.branches,
                    conflicts = stats.conflicts,
                    "search finished"
                );
                Solution::new(status, values, objective, stats)
            }
            (None, true) => Solution::without_values(SolveStatus::Unknown, stats),
            (None, false) => Solution::without_values(SolveStatus::Infeasible, stats),
        }
    }
}

/// One row normalized to `Σ terms ≤ rhs`.
struct Row {
    terms: Vec<(usize, i64)>,
    rhs: i64,
}

/// Backtrackable variable domains.
struct Domains {
    lo: Vec<i64>,
    hi: Vec<i64>,
    // (var, touched lower bound, previous value)
    trail: Vec<(usize, bool, i64)>,
}

impl Domains {
    fn new(model: &Model) -> Self {
        Self {
            lo: model.lower_bounds().to_vec(),
            hi: model.upper_bounds().to_vec(),
            trail: Vec::new(),
        }
    }

    #[inline]
    fn mark(&self) -> usize {
        self.trail.len()
    }

    fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let (var, lower, old) = self.trail.pop().unwrap();
            if lower {
                self.lo[var] = old;
            } else {
                self.hi[var] = old;
            }
        }
    }

    fn tighten_lo(&mut self, var: usize, value: i64) {
        if value > self.lo[var] {
            self.trail.push((var, true, self.lo[var]));
            self.lo[var] = value;
        }
    }

    fn tighten_hi(&mut self, var: usize, value: i64) {
        if value < self.hi[var] {
            self.trail.push((var, false, self.hi[var]));
            self.hi[var] = value;
        }
    }
}

struct Search {
    rows: Vec<Row>,
    domains: Domains,
    objective: Vec<(usize, i64)>,
    has_objective: bool,
    // Branch toward the domain maximum when the net objective
    // coefficient rewards it.
    prefer_high: Vec<bool>,
    deadline: Instant,
    timed_out: bool,
    stop: bool,
    branches: u64,
    conflicts: u64,
    best_values: Option<Vec<i64>>,
    best_objective: i64,
}

impl Search {
    fn new(model: &Model, start: Instant, config: &SolverConfig) -> Self {
        let mut rows = Vec::with_capacity(model.constraint_count());
        for c in model.constraints() {
            let direct = || Row {
                terms: c.terms.iter().map(|&(v, k)| (v.index(), k)).collect(),
                rhs: c.rhs,
            };
            let negated = || Row {
                terms: c.terms.iter().map(|&(v, k)| (v.index(), -k)).collect(),
                rhs: -c.rhs,
            };
            match c.relation {
                Relation::Le => rows.push(direct()),
                Relation::Ge => rows.push(negated()),
                Relation::Eq => {
                    rows.push(direct());
                    rows.push(negated());
                }
            }
        }

        let objective: Vec<(usize, i64)> = model
            .objective()
            .map(|o| o.terms().iter().map(|&(v, k)| (v.index(), k)).collect())
            .unwrap_or_default();
        let has_objective = model.objective().is_some();

        let mut net = vec![0i64; model.var_count()];
        for &(v, k) in &objective {
            net[v] += k;
        }
        let prefer_high = net.iter().map(|&k| k < 0).collect();

        Self {
            rows,
            domains: Domains::new(model),
            objective,
            has_objective,
            prefer_high,
            deadline: start + config.time_limit,
            timed_out: false,
            stop: false,
            branches: 0,
            conflicts: 0,
            best_values: None,
            best_objective: 0,
        }
    }

    /// Bounds propagation to fixpoint. Returns false on a dead end.
    fn propagate(&mut self) -> bool {
        loop {
            let mark = self.domains.mark();
            for row in &self.rows {
                let mut min_activity: i64 = 0;
                for &(v, k) in &row.terms {
                    min_activity += if k > 0 {
                        k * self.domains.lo[v]
                    } else {
                        k * self.domains.hi[v]
                    };
                }
                if min_activity > row.rhs {
                    return false;
                }
                let slack = row.rhs - min_activity;
                for &(v, k) in &row.terms {
                    if k > 0 {
                        let cap = self.domains.lo[v] + slack / k;
                        self.domains.tighten_hi(v, cap);
                    } else {
                        let floor = self.domains.hi[v] - slack / (-k);
                        self.domains.tighten_lo(v, floor);
                    }
                }
            }
            if self.domains.mark() == mark {
                return true;
            }
        }
    }

    fn objective_lower_bound(&self) -> i64 {
        self.objective
            .iter()
            .map(|&(v, k)| {
                if k > 0 {
                    k * self.domains.lo[v]
                } else {
                    k * self.domains.hi[v]
                }
            })
            .sum()
    }

    fn pick_unfixed(&self) -> Option<usize> {
        (0..self.domains.lo.len()).find(|&v| self.domains.lo[v] < self.domains.hi[v])
    }

    fn record_solution(&mut self) {
        let values = self.domains.lo.clone();
        if self.has_objective {
            let objective: i64 = self.objective.iter().map(|&(v, k)| k * values[v]).sum();
            if self.best_values.is_none() || objective < self.best_objective {
                self.best_values = Some(values);
                self.best_objective = objective;
            }
        } else {
            // Satisfaction problem: the first solution settles it.
            self.best_values = Some(values);
            self.stop = true;
        }
    }

    fn dfs(&mut self) {
        if self.stop || self.timed_out {
            return;
        }
        if Instant::now() >= self.deadline {
            self.timed_out = true;
            return;
        }
        if !self.propagate() {
            self.conflicts += 1;
            return;
        }
        if self.has_objective
            && self.best_values.is_some()
            && self.objective_lower_bound() >= self.best_objective
        {
            self.conflicts += 1;
            return;
        }

        let Some(var) = self.pick_unfixed() else {
            self.record_solution();
            return;
        };
        self.branches += 1;

        let (lo, hi) = (self.domains.lo[var], self.domains.hi[var]);
        if self.prefer_high[var] {
            self.descend(var, true, hi);
            if !(self.stop || self.timed_out) {
                self.descend(var, false, hi - 1);
            }
        } else {
            self.descend(var, false, lo);
            if !(self.stop || self.timed_out) {
                self.descend(var, true, lo + 1);
            }
        }
    }

    /// Applies one bound (`lower` picks which side) and recurses.
    fn descend(&mut self, var: usize, lower: bool, value: i64) {
        if lower && value > self.domains.hi[var] || !lower && value < self.domains.lo[var] {
            self.conflicts += 1;
            return;
        }
        let mark = self.domains.mark();
        if lower {
            self.domains.tighten_lo(var, value);
        } else {
            self.domains.tighten_hi(var, value);
        }
        self.dfs();
        self.domains.undo_to(mark);
    }
}
