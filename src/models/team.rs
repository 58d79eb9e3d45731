//! Team and allocation (solution) models.
//!
//! An allocation is the result of one run: the teams that were formed and
//! the warnings raised while checking them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use super::{AssignmentWarning, Student, StudentId};

/// A team of students.
///
/// Members are shared with the input roster; the engine re-associates
/// them and never copies student data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Team id (1-based; may be sparse after empty teams are dropped).
    pub id: u32,
    /// Members, in placement order.
    pub students: Vec<Arc<Student>>,
}

impl Team {
    /// Creates an empty team.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            students: Vec::new(),
        }
    }

    /// Number of members.
    pub fn size(&self) -> usize {
        self.students.len()
    }

    /// Whether the team has no members.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Whether a student with `id` is a member.
    pub fn contains(&self, id: &StudentId) -> bool {
        self.students.iter().any(|s| &s.id == id)
    }

    /// Number of members enrolled in `subject`.
    pub fn count_with_subject(&self, subject: &str) -> usize {
        self.students.iter().filter(|s| s.takes(subject)).count()
    }

    /// Distinct groups held by members for `subject`.
    pub fn groups_for(&self, subject: &str) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for s in &self.students {
            if let Some(g) = s.group_for(subject) {
                if !groups.contains(&g) {
                    groups.push(g);
                }
            }
        }
        groups
    }
}

/// Result of an allocation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Non-empty teams, ordered by id.
    pub teams: Vec<Team>,
    /// Warnings, critical first, then by team, then by criterion.
    pub warnings: Vec<AssignmentWarning>,
}

impl Allocation {
    /// Creates an allocation with no teams that carries a single warning.
    pub fn failed(warning: AssignmentWarning) -> Self {
        Self {
            teams: Vec::new(),
            warnings: vec![warning],
        }
    }

    /// Finds a team by id.
    pub fn team(&self, id: u32) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Team holding the student with `id`.
    pub fn team_of(&self, id: &StudentId) -> Option<&Team> {
        self.teams.iter().find(|t| t.contains(id))
    }

    /// Roster entries not placed in any team.
    pub fn unassigned_students<'a>(&self, roster: &'a [Arc<Student>]) -> Vec<&'a Arc<Student>> {
        let placed: HashSet<&StudentId> = self
            .teams
            .iter()
            .flat_map(|t| t.students.iter().map(|s| &s.id))
            .collect();
        roster.iter().filter(|s| !placed.contains(&s.id)).collect()
    }

    /// Number of placed students.
    pub fn assigned_count(&self) -> usize {
        self.teams.iter().map(Team::size).sum()
    }

    /// Whether any warning is critical.
    pub fn has_critical_warnings(&self) -> bool {
        self.warnings.iter().any(|w| w.is_critical)
    }
}
