//! Assignment warnings.
//!
//! Warnings are produced once allocation has finished. They are collected
//! through [`WarningsBuilder`] and handed back sorted; callers never mutate
//! them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A diagnostic about the produced allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentWarning {
    /// Affected team, if any.
    pub team: Option<u32>,
    /// Affected subject, if any.
    pub subject: Option<String>,
    /// Affected role id, if any.
    pub role: Option<String>,
    /// Affected group, if any.
    pub group: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Whether the allocation fails a hard requirement.
    pub is_critical: bool,
}

impl AssignmentWarning {
    fn new(message: impl Into<String>, is_critical: bool) -> Self {
        Self {
            team: None,
            subject: None,
            role: None,
            group: None,
            message: message.into(),
            is_critical,
        }
    }

    /// Creates a critical warning.
    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(message, true)
    }

    /// Creates a non-critical warning.
    pub fn notice(message: impl Into<String>) -> Self {
        Self::new(message, false)
    }

    /// Sets the team.
    pub fn with_team(mut self, team: u32) -> Self {
        self.team = Some(team);
        self
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets the group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Criterion the warning refers to (subject, else role).
    pub fn criterion(&self) -> Option<&str> {
        self.subject.as_deref().or(self.role.as_deref())
    }

    /// Display ordering: critical first, then team id, then criterion.
    pub fn display_order(&self, other: &Self) -> Ordering {
        other
            .is_critical
            .cmp(&self.is_critical)
            .then_with(|| self.team.cmp(&other.team))
            .then_with(|| self.criterion().cmp(&other.criterion()))
    }
}

/// Collects warnings during synthesis and hands them out once, sorted.
#[derive(Debug, Default)]
pub struct WarningsBuilder {
    warnings: Vec<AssignmentWarning>,
}

impl WarningsBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning.
    pub fn push(&mut self, warning: AssignmentWarning) {
        self.warnings.push(warning);
    }

    /// Number of collected warnings.
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consumes the builder, returning the sorted warnings.
    pub fn finish(mut self) -> Vec<AssignmentWarning> {
        // Stable, so same-rank warnings keep discovery order.
        self.warnings.sort_by(|a, b| a.display_order(b));
        self.warnings
    }
}
