//! Structured decision-variable space.
//!
//! One boolean per (physician, day, period, role) slot, stored dense
//! and addressed by a composite index instead of an encoded name.
//! Every compiler stage reads slots through this map, and extraction
//! walks it backwards, so no string parsing ever happens on either
//! side.

use crate::models::{HalfDay, Role, SchedulingInput};
use crate::solver::{Model, VarId};

/// One decoded slot: who, when, which period, which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Physician index into `SchedulingInput::physicians`.
    pub physician: usize,
    /// Day index into `SchedulingInput::calendar_days`.
    pub day: usize,
    /// Morning or afternoon.
    pub period: HalfDay,
    /// Role of the slot.
    pub role: Role,
    /// Backing model variable.
    pub var: VarId,
}

/// Dense boolean variable space over physician × day × period × role.
#[derive(Debug, Clone)]
pub struct VariableSpace {
    physician_count: usize,
    day_count: usize,
    roles: Vec<Role>,
    vars: Vec<VarId>,
}

impl VariableSpace {
    /// Allocates one boolean per slot, in a fixed enumeration order.
    pub fn create(model: &mut Model, input: &SchedulingInput) -> Self {
        let physician_count = input.physicians.len();
        let day_count = input.calendar_days.len();
        let roles = input.roles.clone();

        let mut vars = Vec::with_capacity(physician_count * day_count * 2 * roles.len());
        for _physician in 0..physician_count {
            for _day in 0..day_count {
                for _period in HalfDay::ALL {
                    for _role in &roles {
                        vars.push(model.new_bool());
                    }
                }
            }
        }

        Self {
            physician_count,
            day_count,
            roles,
            vars,
        }
    }

    /// Number of slot variables.
    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the space holds no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Physicians covered by the space.
    #[inline]
    pub fn physician_count(&self) -> usize {
        self.physician_count
    }

    /// Calendar days covered by the space.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.day_count
    }

    /// Roles in scope, in input order.
    #[inline]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Position of a role in the scope, if present.
    pub fn role_index(&self, role: Role) -> Option<usize> {
        self.roles.iter().position(|r| *r == role)
    }

    fn offset(&self, physician: usize, day: usize, period: HalfDay, role_index: usize) -> usize {
        ((physician * self.day_count + day) * 2 + period.index()) * self.roles.len() + role_index
    }

    /// Variable for one slot; `None` when the role is out of scope.
    pub fn var(&self, physician: usize, day: usize, period: HalfDay, role: Role) -> Option<VarId> {
        let role_index = self.role_index(role)?;
        Some(self.vars[self.offset(physician, day, period, role_index)])
    }

    /// All slot variables, decoded.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.vars.iter().enumerate().map(|(index, &var)| {
            let role = self.roles[index % self.roles.len()];
            let rest = index / self.roles.len();
            let period = HalfDay::ALL[rest % 2];
            let rest = rest / 2;
            Slot {
                physician: rest / self.day_count,
                day: rest % self.day_count,
                period,
                role,
                var,
            }
        })
    }

    /// Role variables in one physician slot, with their roles.
    pub fn slot_roles(&self, physician: usize, day: usize, period: HalfDay) -> Vec<(Role, VarId)> {
        self.roles
            .iter()
            .enumerate()
            .map(|(i, &role)| (role, self.vars[self.offset(physician, day, period, i)]))
            .collect()
    }

    /// One physician's variables for one role across the calendar.
    ///
    /// Empty when the role is out of scope.
    pub fn physician_role_vars(&self, physician: usize, role: Role) -> Vec<VarId> {
        let Some(role_index) = self.role_index(role) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(self.day_count * 2);
        for day in 0..self.day_count {
            for period in HalfDay::ALL {
                out.push(self.vars[self.offset(physician, day, period, role_index)]);
            }
        }
        out
    }

    /// All variables for one role on one day, both periods.
    pub fn day_role_vars(&self, day: usize, role: Role) -> Vec<VarId> {
        let Some(role_index) = self.role_index(role) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(self.physician_count * 2);
        for physician in 0..self.physician_count {
            for period in HalfDay::ALL {
                out.push(self.vars[self.offset(physician, day, period, role_index)]);
            }
        }
        out
    }

    /// All variables for one role in one (day, period) column.
    pub fn period_role_vars(&self, day: usize, period: HalfDay, role: Role) -> Vec<VarId> {
        let Some(role_index) = self.role_index(role) else {
            return Vec::new();
        };
        (0..self.physician_count)
            .map(|physician| self.vars[self.offset(physician, day, period, role_index)])
            .collect()
    }
}
