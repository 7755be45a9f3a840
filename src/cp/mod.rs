//! Constraint-formulation layer.
//!
//! Translates the rostering domain model into an integer-linear
//! constraint model over a dense boolean slot space, one stage per
//! rule family. Stages are individually switchable, so a caller (or a
//! test) can compile any subset; soft stages deposit weighted terms
//! into an [`ObjectiveBuilder`] which the orchestrator installs before
//! solving.
//!
//! # Reference
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Qu, He (2009), "A Hybrid Constraint Programming Approach for
//!   Nurse Rostering Problems"

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Role, SchedulingInput};
use crate::solver::Model;

mod availability;
mod coverage;
mod exclusivity;
mod fairness;
pub mod objective;
mod sdo;
mod spacing;
mod targets;
pub mod variables;
mod weekly;

pub use objective::ObjectiveBuilder;
pub use variables::{Slot, VariableSpace};

/// Switches for the individual constraint stages.
///
/// Defaults to everything on; [`StageSet::none`] plus struct-update
/// syntax selects a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSet {
    pub exclusivity: bool,
    pub unavailability: bool,
    pub sdo: bool,
    pub coverage: bool,
    pub annual_targets: bool,
    pub weekly_rules: bool,
    pub fairness: bool,
    pub spacing: bool,
}

impl StageSet {
    /// Every stage disabled.
    pub fn none() -> Self {
        Self {
            exclusivity: false,
            unavailability: false,
            sdo: false,
            coverage: false,
            annual_targets: false,
            weekly_rules: false,
            fairness: false,
            spacing: false,
        }
    }
}

impl Default for StageSet {
    fn default() -> Self {
        Self {
            exclusivity: true,
            unavailability: true,
            sdo: true,
            coverage: true,
            annual_targets: true,
            weekly_rules: true,
            fairness: true,
            spacing: true,
        }
    }
}

/// Daily staffing floors and bundling calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveragePolicy {
    /// Minimum IMF half-days per day.
    pub generalist_min_per_day: i64,
    /// Minimum DP half-days per day.
    pub core_min_per_day: i64,
    /// Exact DPD count per half-day period.
    pub person_of_day_per_period: i64,
    /// Weekdays whose afternoons bundle DPD with DPWG on top of the
    /// everyday DPED bundle.
    pub triplet_weekdays: Vec<Weekday>,
}

impl Default for CoveragePolicy {
    fn default() -> Self {
        Self {
            generalist_min_per_day: 1,
            core_min_per_day: 5,
            person_of_day_per_period: 1,
            triplet_weekdays: vec![Weekday::Tue, Weekday::Thu],
        }
    }
}

/// How strictly a weekly rule binds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enforcement {
    /// Hard floor; an unmet rule makes the model infeasible.
    Required,
    /// Soft floor; shortfall is charged to the objective.
    Preferred,
}

/// Practice-wide weekly throughput demand for one role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRule {
    pub role: Role,
    pub half_days_per_week: i64,
    pub enforcement: Enforcement,
}

impl WeeklyRule {
    pub fn required(role: Role, half_days_per_week: i64) -> Self {
        Self {
            role,
            half_days_per_week,
            enforcement: Enforcement::Required,
        }
    }

    pub fn preferred(role: Role, half_days_per_week: i64) -> Self {
        Self {
            role,
            half_days_per_week,
            enforcement: Enforcement::Preferred,
        }
    }
}

/// Full compiler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    pub stages: StageSet,
    pub coverage: CoveragePolicy,
    pub weekly_rules: Vec<WeeklyRule>,
    /// Weight on preferred-rule shortfalls, integer-scaled by 100.
    pub preference_weight: f64,
    /// Flat integer weight on fairness deviations.
    pub fairness_weight: f64,
    /// Global multiplier on per-role spacing weights.
    pub spacing_weight: f64,
    /// Roles whose repeat assignments earn spacing rewards.
    pub spacing_roles: BTreeMap<Role, f64>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            stages: StageSet::default(),
            coverage: CoveragePolicy::default(),
            weekly_rules: Vec::new(),
            preference_weight: 1.0,
            fairness_weight: 1.0,
            spacing_weight: 1.0,
            spacing_roles: BTreeMap::from([(Role::Dpd, 1.0)]),
        }
    }
}

/// Runs every enabled stage against the model, in a fixed order.
///
/// Hard stages only touch `model`; soft stages additionally push
/// weighted terms into `objective`.
pub fn apply_stages(
    model: &mut Model,
    space: &VariableSpace,
    input: &SchedulingInput,
    config: &CompileConfig,
    objective: &mut ObjectiveBuilder,
) {
    let stages = &config.stages;

    if stages.exclusivity {
        run(model, "exclusivity", |m| {
            exclusivity::apply(m, space, input);
        });
    }
    if stages.unavailability {
        run(model, "unavailability", |m| {
            availability::apply(m, space, input);
        });
    }
    if stages.sdo {
        run(model, "sdo", |m| {
            sdo::apply(m, space, input);
        });
    }
    if stages.coverage {
        run(model, "coverage", |m| {
            coverage::apply(m, space, input, &config.coverage);
        });
    }
    if stages.annual_targets {
        run(model, "annual_targets", |m| {
            targets::apply(m, space, input);
        });
    }
    if stages.weekly_rules {
        run(model, "weekly_rules", |m| {
            weekly::apply(
                m,
                space,
                input,
                &config.weekly_rules,
                config.preference_weight,
                objective,
            );
        });
    }
    if stages.fairness {
        run(model, "fairness", |m| {
            fairness::apply(m, space, input, config.fairness_weight, objective);
        });
    }
    if stages.spacing {
        run(model, "spacing", |m| {
            spacing::apply(
                m,
                space,
                input,
                config.spacing_weight,
                &config.spacing_roles,
                objective,
            );
        });
    }
}

fn run(model: &mut Model, stage: &'static str, build: impl FnOnce(&mut Model)) {
    let before = model.constraint_count();
    let started = Instant::now();
    build(model);
    info!(
        stage,
        constraints = model.constraint_count() - before,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "constraint stage applied"
    );
}
