//! Role and criterion models.
//!
//! A role is an abstract quota covered by a set of subjects: a student
//! fulfils it through any enrollment in one of those subjects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Student;

/// A role covered by one or more subjects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Subjects that fulfil this role.
    pub subjects: BTreeSet<String>,
    /// Required headcount per team (used in individual minimum mode).
    pub minimum_students: usize,
}

impl Role {
    /// Creates a role with minimum 1 and no subjects.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            subjects: BTreeSet::new(),
            minimum_students: 1,
        }
    }

    /// Sets the role name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a subject that fulfils the role.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.insert(subject.into());
        self
    }

    /// Sets the per-team minimum.
    pub fn with_minimum(mut self, minimum: usize) -> Self {
        self.minimum_students = minimum;
        self
    }

    /// Whether `student` fulfils this role.
    pub fn is_fulfilled_by(&self, student: &Student) -> bool {
        student
            .enrollments
            .iter()
            .any(|sg| self.subjects.contains(&sg.subject))
    }

    /// Name for messages: the role name, or the id when unnamed.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// A quota dimension teams are measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criterion {
    /// A bare subject name.
    Subject(String),
    /// A role spanning several subjects.
    Role(Role),
}

impl Criterion {
    /// Criterion identifier (subject name or role id).
    pub fn id(&self) -> &str {
        match self {
            Criterion::Subject(s) => s,
            Criterion::Role(r) => &r.id,
        }
    }

    /// Whether `student` qualifies for this criterion.
    pub fn is_fulfilled_by(&self, student: &Student) -> bool {
        match self {
            Criterion::Subject(s) => student.takes(s),
            Criterion::Role(r) => r.is_fulfilled_by(student),
        }
    }
}

/// The criteria selected for one allocation run.
///
/// A run allocates either by subject or by role, never a mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CriteriaSelection {
    /// Allocate by subject.
    Subjects(Vec<String>),
    /// Allocate by role.
    Roles(Vec<Role>),
}

impl CriteriaSelection {
    /// Number of selected criteria.
    pub fn len(&self) -> usize {
        match self {
            CriteriaSelection::Subjects(s) => s.len(),
            CriteriaSelection::Roles(r) => r.len(),
        }
    }

    /// Whether no criterion is selected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected criteria as owned [`Criterion`] values.
    pub fn criteria(&self) -> Vec<Criterion> {
        match self {
            CriteriaSelection::Subjects(s) => s.iter().cloned().map(Criterion::Subject).collect(),
            CriteriaSelection::Roles(r) => r.iter().cloned().map(Criterion::Role).collect(),
        }
    }
}
