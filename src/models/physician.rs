//! Physicians, FTE-derived annual budgets, and role targets.
//!
//! A physician's yearly capacity for every duty category is derived
//! from three FTE fractions (total, administrative, research) and a
//! vacation category. All derived values are kept on the half-day
//! grid: quantities are computed in half-days, rounded to the nearest
//! integer half-day (ties to even), then stored as fractional days.
//!
//! # Budget formulas
//!
//! Institutional year = 255 days, trip allotment fixed at 18.
//!
//! | Budget | Formula |
//! |--------|---------|
//! | workdays | 255 × FTE |
//! | vacation | category days × effective clinical FTE |
//! | workdays after vacation/trip | workdays − vacation − 18 |
//! | OSD | 10% of workdays-after |
//! | pathology | 90% of workdays-after |
//! | NVC | 10% of OSD |
//! | clinical | OSD − NVC |
//! | admin / research | 255 × respective FTE |
//! | SDO | 0 for FTE ≥ 1.0, else 255 × (1 − FTE) |
//!
//! # Reference
//! Burke et al. (2004), "The state of the art of nurse rostering"

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::role::{Role, RoleCategory};

/// Length of the institutional working year, in days.
pub const INSTITUTIONAL_YEAR_DAYS: f64 = 255.0;

/// Fixed yearly business-trip allotment, in days.
pub const TRIP_DAYS_PER_YEAR: f64 = 18.0;

const OSD_SHARE: f64 = 0.10;
const PATHOLOGY_SHARE: f64 = 0.90;
const NVC_SHARE: f64 = 0.10;

/// Tolerance for FTE arithmetic checks.
pub const FTE_TOLERANCE: f64 = 0.001;

/// Tolerance for stored-vs-recomputed budget checks, in days.
pub const BUDGET_TOLERANCE_DAYS: f64 = 0.5;

/// Rounds a day count to the nearest half day, ties to even.
///
/// Matches the rounding the budget ledgers were historically built
/// with, so 16.25 days becomes 16.0, not 16.5.
#[inline]
pub fn round_to_half_day(days: f64) -> f64 {
    (days * 2.0).round_ties_even() / 2.0
}

/// Converts a day count on the half-day grid to whole half-day units.
#[inline]
pub fn half_day_units(days: f64) -> i64 {
    (days * 2.0).round() as i64
}

/// Contractual vacation tier, in days per year at full clinical FTE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VacationCategory {
    #[serde(rename = "22")]
    Days22,
    #[serde(rename = "25")]
    Days25,
    #[serde(rename = "30")]
    Days30,
    #[serde(rename = "35")]
    Days35,
}

impl VacationCategory {
    /// Every tier, ascending.
    pub const ALL: [VacationCategory; 4] = [
        VacationCategory::Days22,
        VacationCategory::Days25,
        VacationCategory::Days30,
        VacationCategory::Days35,
    ];

    /// Allotted vacation days at 1.0 effective clinical FTE.
    #[inline]
    pub fn days(self) -> f64 {
        match self {
            VacationCategory::Days22 => 22.0,
            VacationCategory::Days25 => 25.0,
            VacationCategory::Days30 => 30.0,
            VacationCategory::Days35 => 35.0,
        }
    }
}

/// FTE fraction errors raised by the physician factory.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FteError {
    /// An FTE fraction falls outside `0.0..=1.0`.
    #[error("{field} FTE {value} is outside 0.0..=1.0")]
    OutOfRange { field: &'static str, value: f64 },
    /// Admin plus research FTE exceeds the total FTE.
    #[error("admin + research FTE {committed} exceeds total FTE {total}")]
    Overcommitted { committed: f64, total: f64 },
}

/// Yearly day budgets, all on the half-day grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualBudgets {
    /// Total workdays owed for the FTE (includes vacation and trip).
    pub workdays: f64,
    /// Pathology sign-out days.
    pub pathology: f64,
    /// Clinic days (OSD minus NVC).
    pub clinical: f64,
    /// Outpatient service days (clinic plus NVC).
    pub osd: f64,
    /// Non-visit care days.
    pub nvc: f64,
    /// Administrative days.
    pub admin: f64,
    /// Research days.
    pub research: f64,
    /// Scheduled days off compensating a part-time FTE.
    pub sdo: f64,
    /// Business trip days.
    pub trip: f64,
    /// Vacation days.
    pub vacation: f64,
}

impl AnnualBudgets {
    /// Derives all budgets from FTE fractions and a vacation tier.
    ///
    /// Pure arithmetic; range checking is the factory's job.
    pub fn derive(
        fte: f64,
        admin_fte: f64,
        research_fte: f64,
        vacation_category: VacationCategory,
    ) -> Self {
        let effective_clinical = fte - admin_fte - research_fte;
        let workdays = round_to_half_day(INSTITUTIONAL_YEAR_DAYS * fte);
        let vacation = round_to_half_day(vacation_category.days() * effective_clinical);
        let after_vacation_trip = workdays - vacation - TRIP_DAYS_PER_YEAR;
        let osd = round_to_half_day(after_vacation_trip * OSD_SHARE);
        let pathology = round_to_half_day(after_vacation_trip * PATHOLOGY_SHARE);
        let nvc = round_to_half_day(osd * NVC_SHARE);
        let sdo = if fte >= 1.0 {
            0.0
        } else {
            round_to_half_day(INSTITUTIONAL_YEAR_DAYS * (1.0 - fte))
        };

        Self {
            workdays,
            pathology,
            clinical: osd - nvc,
            osd,
            nvc,
            admin: round_to_half_day(INSTITUTIONAL_YEAR_DAYS * admin_fte),
            research: round_to_half_day(INSTITUTIONAL_YEAR_DAYS * research_fte),
            sdo,
            trip: TRIP_DAYS_PER_YEAR,
            vacation,
        }
    }
}

/// Yearly assignment target for one role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualTarget {
    /// Role the target applies to.
    pub role: Role,
    /// Days owed per year.
    pub target_days: f64,
    /// Days already accumulated this year.
    pub current_days: f64,
}

impl AnnualTarget {
    /// Creates a target with nothing accumulated yet.
    pub fn new(role: Role, target_days: f64) -> Self {
        Self {
            role,
            target_days,
            current_days: 0.0,
        }
    }

    /// Days still owed, clamped at zero.
    #[inline]
    pub fn remaining_days(&self) -> f64 {
        (self.target_days - self.current_days).max(0.0)
    }
}

/// A rosterable physician with FTE-derived yearly budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Physician {
    /// Unique name within one scheduling input.
    pub name: String,
    /// Total contracted FTE.
    pub fte: f64,
    /// FTE fraction committed to administration.
    pub admin_fte: f64,
    /// FTE fraction committed to research.
    pub research_fte: f64,
    /// Clinical remainder: `fte − admin_fte − research_fte`.
    pub effective_clinical_fte: f64,
    /// Contractual vacation tier.
    pub vacation_category: VacationCategory,
    /// Derived yearly budgets.
    pub budgets: AnnualBudgets,
    /// Dates the physician would prefer off (SDO placement hints).
    pub preferred_days_off: BTreeSet<NaiveDate>,
    /// Dates the physician cannot work at all.
    pub unavailable_days: BTreeSet<NaiveDate>,
    /// Per-role yearly targets.
    pub annual_targets: BTreeMap<Role, AnnualTarget>,
}

impl Physician {
    /// Creates a physician with budgets and targets derived from FTEs.
    ///
    /// Fails when any FTE fraction leaves `0.0..=1.0` or when admin
    /// plus research exceeds the total (beyond [`FTE_TOLERANCE`]).
    pub fn with_derived_budgets(
        name: impl Into<String>,
        fte: f64,
        admin_fte: f64,
        research_fte: f64,
        vacation_category: VacationCategory,
    ) -> Result<Self, FteError> {
        for (field, value) in [
            ("total", fte),
            ("admin", admin_fte),
            ("research", research_fte),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FteError::OutOfRange { field, value });
            }
        }
        let committed = admin_fte + research_fte;
        if committed > fte + FTE_TOLERANCE {
            return Err(FteError::Overcommitted {
                committed,
                total: fte,
            });
        }

        let budgets = AnnualBudgets::derive(fte, admin_fte, research_fte, vacation_category);
        let annual_targets = default_targets(&budgets);

        Ok(Self {
            name: name.into(),
            fte,
            admin_fte,
            research_fte,
            effective_clinical_fte: fte - admin_fte - research_fte,
            vacation_category,
            budgets,
            preferred_days_off: BTreeSet::new(),
            unavailable_days: BTreeSet::new(),
            annual_targets,
        })
    }

    /// Builder: records preferred days off.
    pub fn with_preferred_days_off(mut self, days: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.preferred_days_off.extend(days);
        self
    }

    /// Builder: records hard unavailability dates.
    pub fn with_unavailable_days(mut self, days: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.unavailable_days.extend(days);
        self
    }

    /// Builder: replaces the even pathology split with a custom one.
    ///
    /// Only pathology-category roles are accepted; other entries are
    /// ignored.
    pub fn with_pathology_split(mut self, split: impl IntoIterator<Item = (Role, f64)>) -> Self {
        for (role, days) in split {
            if role.category() == RoleCategory::Pathology {
                self.annual_targets.insert(role, AnnualTarget::new(role, days));
            }
        }
        self
    }

    /// Whether the physician carries a full-time load.
    #[inline]
    pub fn is_full_time(&self) -> bool {
        self.fte >= 1.0
    }

    /// Yearly target days for one role, zero when untracked.
    #[inline]
    pub fn target_days(&self, role: Role) -> f64 {
        self.annual_targets
            .get(&role)
            .map(|t| t.target_days)
            .unwrap_or(0.0)
    }

    /// Checks stored budgets against recomputation from the FTEs.
    ///
    /// Returns one message per mismatch beyond
    /// [`BUDGET_TOLERANCE_DAYS`]; an empty list means the ledger is
    /// internally consistent. Never stops at the first finding.
    pub fn validate_budgets(&self) -> Vec<String> {
        let expected = AnnualBudgets::derive(
            self.fte,
            self.admin_fte,
            self.research_fte,
            self.vacation_category,
        );
        let mut findings = Vec::new();
        let mut check = |label: &str, stored: f64, computed: f64| {
            if (stored - computed).abs() > BUDGET_TOLERANCE_DAYS {
                findings.push(format!(
                    "{}: {label} budget {stored} differs from computed {computed}",
                    self.name
                ));
            }
        };

        check("vacation", self.budgets.vacation, expected.vacation);
        check("osd", self.budgets.osd, expected.osd);
        check("pathology", self.budgets.pathology, expected.pathology);
        check("nvc", self.budgets.nvc, expected.nvc);
        check("sdo", self.budgets.sdo, expected.sdo);
        check(
            "clinical",
            self.budgets.clinical,
            self.budgets.osd - self.budgets.nvc,
        );

        findings
    }
}

/// Default role targets: pathology split evenly, the rest from budgets.
fn default_targets(budgets: &AnnualBudgets) -> BTreeMap<Role, AnnualTarget> {
    let pathology_roles: Vec<Role> = RoleCategory::Pathology.roles().collect();
    let per_pathology_role = budgets.pathology / pathology_roles.len() as f64;

    let mut targets = BTreeMap::new();
    for role in pathology_roles {
        targets.insert(role, AnnualTarget::new(role, per_pathology_role));
    }
    for (role, days) in [
        (Role::Osd, budgets.osd),
        (Role::Nvc, budgets.nvc),
        (Role::Admin, budgets.admin),
        (Role::Research, budgets.research),
        (Role::Trip, budgets.trip),
        (Role::Vacation, budgets.vacation),
        (Role::Sdo, budgets.sdo),
    ] {
        targets.insert(role, AnnualTarget::new(role, days));
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_timer() -> Physician {
        Physician::with_derived_budgets("Dr. Vance", 1.0, 0.15, 0.05, VacationCategory::Days30)
            .unwrap()
    }

    #[test]
    fn test_effective_clinical_fte() {
        let p = full_timer();
        assert!((p.effective_clinical_fte - 0.8).abs() < FTE_TOLERANCE);
    }

    #[test]
    fn test_full_time_budgets() {
        let b = full_timer().budgets;
        assert_eq!(b.workdays, 255.0);
        assert_eq!(b.vacation, 24.0); // 30 × 0.8
        // after vacation/trip: 255 − 24 − 18 = 213
        assert_eq!(b.osd, 21.5); // 21.3 rounded up to the half-day grid
        assert_eq!(b.pathology, 191.5); // 191.7 rounded down
        assert_eq!(b.nvc, 2.0); // 2.15 rounded
        assert_eq!(b.clinical, 19.5); // osd − nvc
        assert_eq!(b.admin, 38.0); // 38.25 → 76.5 half-days, tie to even
        assert_eq!(b.research, 13.0); // 12.75 → 25.5 half-days, tie to even
        assert_eq!(b.sdo, 0.0);
        assert_eq!(b.trip, 18.0);
    }

    #[test]
    fn test_part_time_sdo() {
        let p = Physician::with_derived_budgets("Dr. Osei", 0.8, 0.0, 0.0, VacationCategory::Days25)
            .unwrap();
        assert_eq!(p.budgets.sdo, 51.0); // (1 − 0.8) × 255
        assert_eq!(p.budgets.workdays, 204.0);
        assert_eq!(p.budgets.vacation, 20.0);
        assert!(!p.is_full_time());
    }

    #[test]
    fn test_sdo_zero_at_full_time() {
        for category in VacationCategory::ALL {
            let p = Physician::with_derived_budgets("ft", 1.0, 0.0, 0.0, category).unwrap();
            assert_eq!(p.budgets.sdo, 0.0);
        }
    }

    #[test]
    fn test_budgets_stay_on_half_day_grid() {
        let ftes = [0.1, 0.2, 0.35, 0.5, 0.6, 0.77, 0.8, 0.9, 1.0];
        for fte in ftes {
            for category in VacationCategory::ALL {
                let b = AnnualBudgets::derive(fte, 0.0, 0.0, category);
                for (label, value) in [
                    ("workdays", b.workdays),
                    ("pathology", b.pathology),
                    ("clinical", b.clinical),
                    ("osd", b.osd),
                    ("nvc", b.nvc),
                    ("admin", b.admin),
                    ("research", b.research),
                    ("sdo", b.sdo),
                    ("trip", b.trip),
                    ("vacation", b.vacation),
                ] {
                    let doubled = value * 2.0;
                    assert!(
                        (doubled - doubled.round()).abs() < 1e-9,
                        "{label} = {value} off the half-day grid at fte {fte}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_vacation_rounding_ties_to_even() {
        // 25 × 0.65 = 16.25 days = 32.5 half-days → 32, not 33
        let b = AnnualBudgets::derive(0.65, 0.0, 0.0, VacationCategory::Days25);
        assert_eq!(b.vacation, 16.0);
    }

    #[test]
    fn test_fte_out_of_range_rejected() {
        let err = Physician::with_derived_budgets("bad", 1.2, 0.0, 0.0, VacationCategory::Days25)
            .unwrap_err();
        assert!(matches!(err, FteError::OutOfRange { field: "total", .. }));

        let err = Physician::with_derived_budgets("bad", 0.8, -0.1, 0.0, VacationCategory::Days25)
            .unwrap_err();
        assert!(matches!(err, FteError::OutOfRange { field: "admin", .. }));
    }

    #[test]
    fn test_overcommitted_fte_rejected() {
        let err = Physician::with_derived_budgets("bad", 0.5, 0.4, 0.2, VacationCategory::Days25)
            .unwrap_err();
        assert!(matches!(err, FteError::Overcommitted { .. }));
    }

    #[test]
    fn test_default_targets_cover_catalogue() {
        let p = full_timer();
        assert_eq!(p.annual_targets.len(), Role::ALL.len());

        let per_role = p.budgets.pathology / 6.0;
        for role in RoleCategory::Pathology.roles() {
            assert!((p.target_days(role) - per_role).abs() < 1e-9);
        }
        assert_eq!(p.target_days(Role::Trip), 18.0);
        assert_eq!(p.target_days(Role::Vacation), p.budgets.vacation);
    }

    #[test]
    fn test_custom_pathology_split() {
        let p = full_timer().with_pathology_split([
            (Role::Dp, 120.0),
            (Role::Imf, 40.0),
            (Role::Osd, 99.0), // not pathology, ignored
        ]);
        assert_eq!(p.target_days(Role::Dp), 120.0);
        assert_eq!(p.target_days(Role::Imf), 40.0);
        assert_eq!(p.target_days(Role::Osd), p.budgets.osd);
    }

    #[test]
    fn test_validate_budgets_clean() {
        assert!(full_timer().validate_budgets().is_empty());
    }

    #[test]
    fn test_validate_budgets_reports_each_mismatch() {
        let mut p = full_timer();
        p.budgets.vacation += 2.0;
        let findings = p.validate_budgets();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("vacation"));

        p.budgets.sdo = 40.0;
        let findings = p.validate_budgets();
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_target_remaining_clamps_at_zero() {
        let mut target = AnnualTarget::new(Role::Dp, 10.0);
        target.current_days = 4.0;
        assert_eq!(target.remaining_days(), 6.0);
        target.current_days = 12.0;
        assert_eq!(target.remaining_days(), 0.0);
    }

    #[test]
    fn test_half_day_unit_conversion() {
        assert_eq!(half_day_units(51.0), 102);
        assert_eq!(half_day_units(21.5), 43);
        assert_eq!(half_day_units(0.0), 0);
    }
}
