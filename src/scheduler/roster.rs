//! Roster orchestration pipeline.
//!
//! Drives formulation and solving through an explicit phase machine:
//!
//! 1. `new` — validate the input
//! 2. `create_variables` — allocate the slot variable space
//! 3. `apply_constraints` — run the enabled compiler stages
//! 4. `set_objective` — install collected soft terms, if any
//! 5. `solve_with` — hand the model to a [`CpSolver`]
//! 6. `extract` — decode engine values into a [`Schedule`]
//!
//! Each step checks its phase precondition and fails with a
//! [`RosterError::Phase`] when called out of order, so a half-built
//! model can never reach the engine. Infeasibility is a legitimate
//! outcome ([`RosterOutcome::Infeasible`]), not an error; only
//! engine breakdowns (invalid model, no verdict before the deadline)
//! surface as [`RosterError::Solver`], leaving the pipeline ready
//! for another solve attempt.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::kpi::RosterKpi;
use crate::cp::{apply_stages, CompileConfig, ObjectiveBuilder, VariableSpace};
use crate::models::{Assignment, Schedule, SchedulingInput};
use crate::solver::{CpSolver, Model, Solution, SolveStats, SolveStatus, SolverConfig};
use crate::validation::{validate_input, ValidationError};

/// Pipeline phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    VariablesCreated,
    ConstraintsApplied,
    ObjectiveSet,
    Solved,
    Extracted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Uninitialized => "uninitialized",
            Phase::VariablesCreated => "variables_created",
            Phase::ConstraintsApplied => "constraints_applied",
            Phase::ObjectiveSet => "objective_set",
            Phase::Solved => "solved",
            Phase::Extracted => "extracted",
        })
    }
}

/// Orchestration failures.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The input failed validation; all findings are attached.
    #[error("invalid scheduling input: {} finding(s)", .0.len())]
    InvalidInput(Vec<ValidationError>),
    /// A step was called out of order.
    #[error("step requires phase {expected}, pipeline is at {actual}")]
    Phase { expected: Phase, actual: Phase },
    /// The engine stopped without a usable verdict.
    #[error("solver stopped with status {0}")]
    Solver(SolveStatus),
}

/// Outcome of a completed pipeline run.
#[derive(Debug, Clone)]
pub enum RosterOutcome {
    /// A roster was extracted from an optimal or feasible solution.
    Solved {
        schedule: Schedule,
        /// Objective value, absent for pure satisfaction models.
        objective: Option<i64>,
        stats: SolveStats,
    },
    /// The constraints admit no roster.
    Infeasible { stats: SolveStats },
}

impl RosterOutcome {
    /// The extracted roster, when one exists.
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            RosterOutcome::Solved { schedule, .. } => Some(schedule),
            RosterOutcome::Infeasible { .. } => None,
        }
    }

    /// Search effort counters, regardless of outcome.
    pub fn stats(&self) -> SolveStats {
        match self {
            RosterOutcome::Solved { stats, .. } | RosterOutcome::Infeasible { stats } => *stats,
        }
    }
}

/// Phase-checked rostering pipeline.
///
/// # Example
/// ```no_run
/// use rotaplan::cp::CompileConfig;
/// use rotaplan::models::{consecutive_days, Physician, Role, SchedulingInput, VacationCategory};
/// use rotaplan::scheduler::RosterPipeline;
/// use rotaplan::solver::{BranchBoundSolver, SolverConfig};
/// use chrono::NaiveDate;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let physician =
///     Physician::with_derived_budgets("Dr. Park", 1.0, 0.1, 0.0, VacationCategory::Days30)?;
/// let input = SchedulingInput::new()
///     .with_physician(physician)
///     .with_calendar_days(consecutive_days(
///         NaiveDate::from_ymd_opt(2025, 1, 6).ok_or("bad date")?,
///         5,
///     ))
///     .with_roles([Role::Imf, Role::Dp, Role::Dpd])
///     .with_loose_coverage();
///
/// let outcome = RosterPipeline::run(
///     input,
///     CompileConfig::default(),
///     &BranchBoundSolver::new(),
///     &SolverConfig::default(),
/// )?;
/// if let Some(schedule) = outcome.schedule() {
///     println!("{} assignments", schedule.assignment_count());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RosterPipeline {
    input: SchedulingInput,
    config: CompileConfig,
    phase: Phase,
    model: Model,
    space: Option<VariableSpace>,
    pending_objective: Option<ObjectiveBuilder>,
    solution: Option<Solution>,
}

impl RosterPipeline {
    /// Validates the input and opens a pipeline at
    /// [`Phase::Uninitialized`].
    pub fn new(input: SchedulingInput, config: CompileConfig) -> Result<Self, RosterError> {
        validate_input(&input).map_err(RosterError::InvalidInput)?;
        Ok(Self {
            input,
            config,
            phase: Phase::Uninitialized,
            model: Model::new(),
            space: None,
            pending_objective: None,
            solution: None,
        })
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The validated input.
    #[inline]
    pub fn input(&self) -> &SchedulingInput {
        &self.input
    }

    /// The model built so far, for inspection.
    #[inline]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The slot variable space, once created.
    #[inline]
    pub fn variable_space(&self) -> Option<&VariableSpace> {
        self.space.as_ref()
    }

    /// Counters from the most recent conclusive solve.
    pub fn last_stats(&self) -> Option<SolveStats> {
        self.solution.as_ref().map(|s| s.stats)
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), RosterError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(RosterError::Phase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Allocates one boolean per (physician, day, period, role) slot.
    pub fn create_variables(&mut self) -> Result<(), RosterError> {
        self.expect_phase(Phase::Uninitialized)?;
        let space = VariableSpace::create(&mut self.model, &self.input);
        info!(variables = space.len(), "decision variables created");
        self.space = Some(space);
        self.phase = Phase::VariablesCreated;
        Ok(())
    }

    /// Runs the enabled constraint stages against the model.
    pub fn apply_constraints(&mut self) -> Result<(), RosterError> {
        self.expect_phase(Phase::VariablesCreated)?;
        let Some(space) = self.space.as_ref() else {
            return Err(RosterError::Phase {
                expected: Phase::VariablesCreated,
                actual: self.phase,
            });
        };

        let mut objective = ObjectiveBuilder::new();
        apply_stages(&mut self.model, space, &self.input, &self.config, &mut objective);
        info!(
            constraints = self.model.constraint_count(),
            soft_terms = objective.term_count(),
            "constraint stages applied"
        );
        self.pending_objective = Some(objective);
        self.phase = Phase::ConstraintsApplied;
        Ok(())
    }

    /// Installs the collected soft terms as the minimization target.
    ///
    /// With no terms the model stays a satisfaction problem.
    pub fn set_objective(&mut self) -> Result<(), RosterError> {
        self.expect_phase(Phase::ConstraintsApplied)?;
        let objective = self.pending_objective.take().unwrap_or_default();
        match objective.install(&mut self.model) {
            Some(_) => info!("objective installed"),
            None => info!("no soft terms; solving for satisfaction"),
        }
        self.phase = Phase::ObjectiveSet;
        Ok(())
    }

    /// Hands the model to the engine.
    ///
    /// Conclusive statuses (a solution, or proven infeasibility)
    /// advance the pipeline. Invalid and unknown verdicts return an
    /// error and leave the phase untouched, so the caller may try
    /// again with a different engine or a longer deadline.
    pub fn solve_with<S: CpSolver>(
        &mut self,
        solver: &S,
        solver_config: &SolverConfig,
    ) -> Result<SolveStatus, RosterError> {
        self.expect_phase(Phase::ObjectiveSet)?;
        let solution = solver.solve(&self.model, solver_config);
        info!(
            status = %solution.status,
            branches = solution.stats.branches,
            conflicts = solution.stats.conflicts,
            wall_ms = solution.stats.wall_time.as_millis() as u64,
            "solve finished"
        );

        let status = solution.status;
        match status {
            SolveStatus::Optimal | SolveStatus::Feasible | SolveStatus::Infeasible => {
                self.solution = Some(solution);
                self.phase = Phase::Solved;
                Ok(status)
            }
            SolveStatus::Invalid | SolveStatus::Unknown => Err(RosterError::Solver(status)),
        }
    }

    /// Decodes engine values into a sorted roster.
    ///
    /// Slot variables the engine failed to value are logged and
    /// skipped rather than failing the whole extraction.
    pub fn extract(&mut self) -> Result<RosterOutcome, RosterError> {
        self.expect_phase(Phase::Solved)?;
        let (Some(solution), Some(space)) = (self.solution.as_ref(), self.space.as_ref()) else {
            return Err(RosterError::Phase {
                expected: Phase::Solved,
                actual: self.phase,
            });
        };

        if !solution.has_solution() {
            self.phase = Phase::Extracted;
            return Ok(RosterOutcome::Infeasible {
                stats: solution.stats,
            });
        }

        let mut assignments = Vec::new();
        for slot in space.slots() {
            let physician = &self.input.physicians[slot.physician];
            let date = self.input.calendar_days[slot.day];
            match solution.value(slot.var) {
                Some(1) => assignments.push(Assignment::new(
                    physician.name.clone(),
                    date,
                    slot.period,
                    slot.role,
                )),
                Some(_) => {}
                None => warn!(
                    physician = %physician.name,
                    day = %date,
                    period = %slot.period,
                    role = %slot.role,
                    "slot variable missing from solution; skipped"
                ),
            }
        }

        let schedule = Schedule::from_assignments(assignments);
        info!(assignments = schedule.assignment_count(), "roster extracted");
        self.phase = Phase::Extracted;
        Ok(RosterOutcome::Solved {
            schedule,
            objective: solution.objective,
            stats: solution.stats,
        })
    }

    /// Runs the whole pipeline front to back, logging roster quality
    /// metrics when a schedule comes out.
    pub fn run<S: CpSolver>(
        input: SchedulingInput,
        config: CompileConfig,
        solver: &S,
        solver_config: &SolverConfig,
    ) -> Result<RosterOutcome, RosterError> {
        let mut pipeline = Self::new(input, config)?;
        pipeline.create_variables()?;
        pipeline.apply_constraints()?;
        pipeline.set_objective()?;
        pipeline.solve_with(solver, solver_config)?;
        let outcome = pipeline.extract()?;
        if let Some(schedule) = outcome.schedule() {
            let kpi = RosterKpi::calculate(schedule, pipeline.input());
            info!(
                workload_balance = kpi.workload_balance,
                coverage_consistency = kpi.coverage_consistency,
                avg_daily_coverage = kpi.avg_daily_coverage,
                "roster quality"
            );
        }
        Ok(outcome)
    }
}
