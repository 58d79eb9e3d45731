//! Student model.
//!
//! A student is an immutable roster entry: identity, contact details and
//! the course sections ("groups") it is enrolled in, one per subject.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique student identifier.
///
/// Rosters carry either textual ids (`"s-042"`) or numeric ids (`42`).
/// Both forms are kept as-is; `Text("42")` and `Number(42)` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentId {
    /// Numeric identifier.
    Number(i64),
    /// Textual identifier.
    Text(String),
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentId::Number(n) => write!(f, "{n}"),
            StudentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StudentId {
    fn from(value: i64) -> Self {
        StudentId::Number(value)
    }
}

impl From<&str> for StudentId {
    fn from(value: &str) -> Self {
        StudentId::Text(value.to_string())
    }
}

impl From<String> for StudentId {
    fn from(value: String) -> Self {
        StudentId::Text(value)
    }
}

/// A course section: one group of one subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectGroup {
    /// Subject name (e.g., "Math").
    pub subject: String,
    /// Group (section) within the subject (e.g., "A").
    pub group: String,
}

impl SubjectGroup {
    /// Creates a new subject group.
    pub fn new(subject: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            group: group.into(),
        }
    }
}

/// A student to be placed in a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Enrollments, in roster order.
    pub enrollments: Vec<SubjectGroup>,
}

impl Student {
    /// Creates a student with the given identifier.
    pub fn new(id: impl Into<StudentId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: String::new(),
            enrollments: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Adds an enrollment.
    pub fn with_enrollment(mut self, subject: impl Into<String>, group: impl Into<String>) -> Self {
        self.enrollments.push(SubjectGroup::new(subject, group));
        self
    }

    /// Group held for `subject`, if enrolled.
    pub fn group_for(&self, subject: &str) -> Option<&str> {
        self.enrollments
            .iter()
            .find(|sg| sg.subject == subject)
            .map(|sg| sg.group.as_str())
    }

    /// Whether the student is enrolled in `subject`.
    pub fn takes(&self, subject: &str) -> bool {
        self.enrollments.iter().any(|sg| sg.subject == subject)
    }

    /// Number of enrollments.
    pub fn enrollment_count(&self) -> usize {
        self.enrollments.len()
    }

    /// Name for messages: the display name, or the id when unnamed.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_builder() {
        let s = Student::new("s1")
            .with_name("Ada")
            .with_email("ada@example.edu")
            .with_enrollment("Math", "A")
            .with_enrollment("Physics", "B");

        assert_eq!(s.id, StudentId::Text("s1".into()));
        assert_eq!(s.name, "Ada");
        assert_eq!(s.enrollment_count(), 2);
        assert_eq!(s.group_for("Math"), Some("A"));
        assert_eq!(s.group_for("Physics"), Some("B"));
        assert_eq!(s.group_for("Chemistry"), None);
        assert!(s.takes("Math"));
        assert!(!s.takes("Art"));
    }

    #[test]
    fn test_label_falls_back_to_id() {
        assert_eq!(Student::new(7).label(), "7");
        assert_eq!(Student::new(7).with_name("Bo").label(), "Bo");
    }

    #[test]
    fn test_student_id_untagged_serde() {
        let ids: Vec<StudentId> = serde_json::from_str(r#"[12, "x-3"]"#).unwrap();
        assert_eq!(ids[0], StudentId::Number(12));
        assert_eq!(ids[1], StudentId::Text("x-3".into()));
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[12,"x-3"]"#);
    }
}
