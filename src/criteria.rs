//! Criterion model: minimums, upper limits and scarcity ordering.
//!
//! Pure functions over the roster and the selected criteria. Nothing here
//! touches team state; the allocator builds on these to decide how many
//! teams are possible and in which order criteria are seeded.
//!
//! # Minimums
//!
//! | Mode | Minimum for criterion `c` |
//! |------|---------------------------|
//! | `Global` | `global_min` |
//! | `Individual` | `individual[c]`, else the role's `minimum_students`, else 1 |
//!
//! Every configured minimum is clamped to at least 1. The upper limit is
//! `minimum + offset` and is a soft cap: only the balancing heuristics
//! look at it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{Criterion, Role, Student, Team};

/// How per-team minimums are configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinStudentMode {
    /// One minimum for every criterion.
    #[default]
    Global,
    /// A minimum per criterion (default 1).
    Individual,
}

/// Minimum headcount configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimumConfig {
    /// Configuration mode.
    pub mode: MinStudentMode,
    /// Minimum used in `Global` mode.
    pub global_min: usize,
    /// Per-criterion minimums used in `Individual` mode.
    pub individual: HashMap<String, usize>,
}

impl Default for MinimumConfig {
    fn default() -> Self {
        Self {
            mode: MinStudentMode::Global,
            global_min: 1,
            individual: HashMap::new(),
        }
    }
}

impl MinimumConfig {
    /// Same minimum for every criterion.
    pub fn global(min: usize) -> Self {
        Self {
            mode: MinStudentMode::Global,
            global_min: min,
            individual: HashMap::new(),
        }
    }

    /// Per-criterion minimums; add entries with [`with_minimum`](Self::with_minimum).
    pub fn individual() -> Self {
        Self {
            mode: MinStudentMode::Individual,
            global_min: 1,
            individual: HashMap::new(),
        }
    }

    /// Sets the minimum for one criterion.
    pub fn with_minimum(mut self, criterion_id: impl Into<String>, min: usize) -> Self {
        self.individual.insert(criterion_id.into(), min);
        self
    }

    /// Configured minimum for a subject or role id.
    pub fn configured_min(&self, criterion_id: &str) -> usize {
        let raw = match self.mode {
            MinStudentMode::Global => self.global_min,
            MinStudentMode::Individual => self.individual.get(criterion_id).copied().unwrap_or(1),
        };
        raw.max(1)
    }

    /// Configured minimum for a criterion.
    ///
    /// In `Individual` mode a role without an explicit entry falls back to its
    /// own `minimum_students`.
    pub fn minimum_for(&self, criterion: &Criterion) -> usize {
        match (self.mode, criterion) {
            (MinStudentMode::Individual, Criterion::Role(role)) => self.role_minimum(role),
            _ => self.configured_min(criterion.id()),
        }
    }

    fn role_minimum(&self, role: &Role) -> usize {
        self.individual
            .get(&role.id)
            .copied()
            .unwrap_or(role.minimum_students)
            .max(1)
    }
}

/// Soft per-team ceiling for a criterion with minimum `min`.
#[inline]
pub fn upper_limit(min: usize, offset: usize) -> usize {
    min + offset
}

/// Number of distinct students qualifying for `criterion`.
pub fn students_for_criterion(students: &[Arc<Student>], criterion: &Criterion) -> usize {
    students
        .iter()
        .filter(|s| criterion.is_fulfilled_by(s))
        .count()
}

/// Members of `team` enrolled in `subject`.
pub fn count_students_with_subject(team: &Team, subject: &str) -> usize {
    team.count_with_subject(subject)
}

/// Members of `team` fulfilling `role`. Each member counts once.
pub fn count_students_with_role(team: &Team, role: &Role) -> usize {
    team.students
        .iter()
        .filter(|s| role.is_fulfilled_by(s))
        .count()
}

/// Criterion indices sorted scarcest first.
///
/// Ties keep the input order.
pub fn scarcity_order(students_per_criterion: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..students_per_criterion.len()).collect();
    order.sort_by_key(|&i| students_per_criterion[i]);
    order
}
