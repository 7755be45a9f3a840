//! Duty roles and half-day periods.
//!
//! Defines the fixed role catalogue a physician can be rostered into,
//! the category each role belongs to, and the morning/afternoon period
//! grid. Categories drive the exclusivity rules: a physician holds at
//! most one category per half-day, with a small set of pathology roles
//! allowed to stack.
//!
//! # Reference
//! Ernst et al. (2004), "Staff scheduling and rostering: A review of
//! applications, methods and models"

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rosterable duty role.
///
/// The catalogue is fixed: departments pick a subset per planning run
/// via [`SchedulingInput::roles`](crate::models::SchedulingInput), but
/// the category of each role never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Immunodermatology sign-out (generalist pathology coverage).
    Imf,
    /// Dermatopathology sign-out (core pathology service).
    Dp,
    /// Dermatopathology person-of-day (rotating point of contact).
    Dpd,
    /// Dermatopathology working group.
    Dpwg,
    /// Dermatopathology education session.
    Dped,
    /// General education duty.
    Education,
    /// Outpatient service day (clinic).
    Osd,
    /// Non-visit care (remote/asynchronous patient work).
    Nvc,
    /// Administrative duty.
    Admin,
    /// Protected research time.
    Research,
    /// Business trip / conference allotment.
    Trip,
    /// Vacation day.
    Vacation,
    /// Scheduled day off (part-time FTE compensation).
    Sdo,
}

/// Role categories. A physician's half-day belongs to at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    Pathology,
    Clinical,
    Administrative,
    Research,
    TimeOff,
}

impl Role {
    /// Every role in the catalogue, in canonical order.
    pub const ALL: [Role; 13] = [
        Role::Imf,
        Role::Dp,
        Role::Dpd,
        Role::Dpwg,
        Role::Dped,
        Role::Education,
        Role::Osd,
        Role::Nvc,
        Role::Admin,
        Role::Research,
        Role::Trip,
        Role::Vacation,
        Role::Sdo,
    ];

    /// Pathology roles that may stack for one physician in one half-day.
    pub const COMBINABLE: [Role; 4] = [Role::Dp, Role::Dpd, Role::Dpwg, Role::Dped];

    /// The category this role belongs to.
    #[inline]
    pub fn category(self) -> RoleCategory {
        match self {
            Role::Imf | Role::Dp | Role::Dpd | Role::Dpwg | Role::Dped | Role::Education => {
                RoleCategory::Pathology
            }
            Role::Osd | Role::Nvc => RoleCategory::Clinical,
            Role::Admin => RoleCategory::Administrative,
            Role::Research => RoleCategory::Research,
            Role::Trip | Role::Vacation | Role::Sdo => RoleCategory::TimeOff,
        }
    }

    /// Whether this role may share a half-day with other combinable roles.
    #[inline]
    pub fn is_combinable(self) -> bool {
        Role::COMBINABLE.contains(&self)
    }

    /// Whether this role represents time away from duty.
    #[inline]
    pub fn is_time_off(self) -> bool {
        self.category() == RoleCategory::TimeOff
    }

    /// Stable lowercase token, used in exports and logs.
    pub fn token(self) -> &'static str {
        match self {
            Role::Imf => "imf",
            Role::Dp => "dp",
            Role::Dpd => "dpd",
            Role::Dpwg => "dpwg",
            Role::Dped => "dped",
            Role::Education => "education",
            Role::Osd => "osd",
            Role::Nvc => "nvc",
            Role::Admin => "admin",
            Role::Research => "research",
            Role::Trip => "trip",
            Role::Vacation => "vacation",
            Role::Sdo => "sdo",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.token() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Error for a role token outside the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role token: {0:?}")]
pub struct UnknownRole(pub String);

/// Error for a period token other than `morning`/`afternoon`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown half-day token: {0:?}")]
pub struct UnknownHalfDay(pub String);

impl RoleCategory {
    /// Every category, in canonical order.
    pub const ALL: [RoleCategory; 5] = [
        RoleCategory::Pathology,
        RoleCategory::Clinical,
        RoleCategory::Administrative,
        RoleCategory::Research,
        RoleCategory::TimeOff,
    ];

    /// Roles belonging to this category, in catalogue order.
    pub fn roles(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |r| r.category() == self)
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoleCategory::Pathology => "pathology",
            RoleCategory::Clinical => "clinical",
            RoleCategory::Administrative => "administrative",
            RoleCategory::Research => "research",
            RoleCategory::TimeOff => "time_off",
        };
        f.write_str(s)
    }
}

/// One of the two rosterable periods of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfDay {
    Morning,
    Afternoon,
}

impl HalfDay {
    /// Both periods, morning first.
    pub const ALL: [HalfDay; 2] = [HalfDay::Morning, HalfDay::Afternoon];

    /// Position in the period grid (morning 0, afternoon 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            HalfDay::Morning => 0,
            HalfDay::Afternoon => 1,
        }
    }

    /// Stable lowercase token, used in exports and logs.
    pub fn token(self) -> &'static str {
        match self {
            HalfDay::Morning => "morning",
            HalfDay::Afternoon => "afternoon",
        }
    }
}

impl fmt::Display for HalfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for HalfDay {
    type Err = UnknownHalfDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(HalfDay::Morning),
            "afternoon" => Ok(HalfDay::Afternoon),
            other => Err(UnknownHalfDay(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_exactly_one_category() {
        for role in Role::ALL {
            let memberships = RoleCategory::ALL
                .into_iter()
                .filter(|c| c.roles().any(|r| r == role))
                .count();
            assert_eq!(memberships, 1, "role {role} must sit in one category");
        }
    }

    #[test]
    fn test_combinable_roles_are_pathology() {
        for role in Role::COMBINABLE {
            assert_eq!(role.category(), RoleCategory::Pathology);
            assert!(role.is_combinable());
        }
        // Pathology membership alone is not enough to stack
        assert!(!Role::Imf.is_combinable());
        assert!(!Role::Education.is_combinable());
    }

    #[test]
    fn test_time_off_roles() {
        assert!(Role::Trip.is_time_off());
        assert!(Role::Vacation.is_time_off());
        assert!(Role::Sdo.is_time_off());
        assert!(!Role::Dp.is_time_off());
    }

    #[test]
    fn test_token_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.token().parse::<Role>().unwrap(), role);
        }
        assert!("weekend".parse::<Role>().is_err());
    }

    #[test]
    fn test_half_day_tokens() {
        assert_eq!(HalfDay::Morning.index(), 0);
        assert_eq!(HalfDay::Afternoon.index(), 1);
        assert_eq!("afternoon".parse::<HalfDay>().unwrap(), HalfDay::Afternoon);
        assert!("evening".parse::<HalfDay>().is_err());
    }

    #[test]
    fn test_serde_tokens_match_display() {
        let json = serde_json::to_string(&Role::Dpwg).unwrap();
        assert_eq!(json, "\"dpwg\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::Dpwg);
    }
}
