//! Roster quality metrics (KPIs).
//!
//! Computes distribution indicators from an extracted roster and the
//! input it was built from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Workload Balance | 1 − stddev/mean of per-physician counts |
//! | Coverage Consistency | 1 − stddev/mean of per-day counts |
//! | Avg Daily Coverage | Assignments per calendar day |
//!
//! Both ratio metrics live in `0.0..=1.0`; 1.0 means perfectly even.
//! Physicians and days with zero assignments count toward the spread.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use crate::models::{Schedule, SchedulingInput};

/// Roster distribution indicators.
#[derive(Debug, Clone)]
pub struct RosterKpi {
    /// Evenness of assignment counts across physicians (0.0..1.0).
    pub workload_balance: f64,
    /// Evenness of assignment counts across days (0.0..1.0).
    pub coverage_consistency: f64,
    /// Mean number of assignments per calendar day.
    pub avg_daily_coverage: f64,
    /// Assignment count per physician, including idle ones.
    pub assignments_per_physician: BTreeMap<String, usize>,
}

impl RosterKpi {
    /// Computes KPIs from a roster and the input it answers.
    pub fn calculate(schedule: &Schedule, input: &SchedulingInput) -> Self {
        let counted = schedule.counts_by_physician();
        let mut assignments_per_physician = BTreeMap::new();
        for physician in &input.physicians {
            let count = counted.get(physician.name.as_str()).copied().unwrap_or(0);
            assignments_per_physician.insert(physician.name.clone(), count);
        }

        let physician_counts: Vec<f64> = assignments_per_physician
            .values()
            .map(|&c| c as f64)
            .collect();
        let workload_balance = evenness(&physician_counts);

        let by_day = schedule.counts_by_day();
        let day_counts: Vec<f64> = input
            .calendar_days
            .iter()
            .map(|day| by_day.get(day).copied().unwrap_or(0) as f64)
            .collect();
        let coverage_consistency = evenness(&day_counts);

        let avg_daily_coverage = if input.calendar_days.is_empty() {
            0.0
        } else {
            schedule.assignment_count() as f64 / input.calendar_days.len() as f64
        };

        Self {
            workload_balance,
            coverage_consistency,
            avg_daily_coverage,
            assignments_per_physician,
        }
    }

    /// Whether the roster meets the given distribution thresholds.
    pub fn meets_thresholds(&self, min_balance: f64, min_consistency: f64) -> bool {
        self.workload_balance >= min_balance && self.coverage_consistency >= min_consistency
    }
}

/// `1 − stddev/mean`, clamped to `0.0..=1.0`; 1.0 for empty or
/// all-zero samples.
fn evenness(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 1.0;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    if mean <= 0.0 {
        return 1.0;
    }
    let variance =
        samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;
    (1.0 - variance.sqrt() / mean).max(0.0)
}
