//! Input validation for allocation requests.
//!
//! Checks structural integrity of the roster and the selected criteria
//! before allocation. Detects:
//! - Duplicate student IDs
//! - Students holding two groups of the same subject
//! - Duplicate criteria (subject names or role IDs)
//! - Roles with no covering subject
//!
//! Empty rosters and empty criteria are not errors here; the allocator
//! reports them as critical warnings.

use std::collections::HashSet;
use std::sync::Arc;

use crate::models::{CriteriaSelection, Student};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A student holds more than one group for a subject.
    AmbiguousGroup,
    /// The same criterion is selected twice.
    DuplicateCriterion,
    /// A role lists no subjects.
    EmptyRole,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for an allocation run.
///
/// Checks:
/// 1. No duplicate student IDs
/// 2. At most one group per subject for each student
/// 3. No duplicate subject names / role IDs among the criteria
/// 4. Every role covers at least one subject
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(students: &[Arc<Student>], criteria: &CriteriaSelection) -> ValidationResult {
    let mut errors = Vec::new();

    let mut student_ids = HashSet::new();
    for s in students {
        if !student_ids.insert(&s.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate student ID: {}", s.id),
            ));
        }

        let mut subjects = HashSet::new();
        for sg in &s.enrollments {
            if !subjects.insert(sg.subject.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::AmbiguousGroup,
                    format!(
                        "Student '{}' holds more than one group of '{}'",
                        s.id, sg.subject
                    ),
                ));
            }
        }
    }

    match criteria {
        CriteriaSelection::Subjects(subjects) => {
            let mut seen = HashSet::new();
            for subject in subjects {
                if !seen.insert(subject.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DuplicateCriterion,
                        format!("Subject '{subject}' is selected twice"),
                    ));
                }
            }
        }
        CriteriaSelection::Roles(roles) => {
            let mut seen = HashSet::new();
            for role in roles {
                if !seen.insert(role.id.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DuplicateId,
                        format!("Duplicate role ID: {}", role.id),
                    ));
                }
                if role.subjects.is_empty() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::EmptyRole,
                        format!("Role '{}' has no subjects", role.id),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
