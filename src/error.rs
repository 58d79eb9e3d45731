//! Allocation errors.
//!
//! Expected outcomes (infeasible quotas, unplaced students) are reported as
//! warnings inside an [`Allocation`](crate::models::Allocation). Errors are
//! reserved for malformed input and broken internal invariants.

use thiserror::Error;

use crate::models::StudentId;
use crate::validation::ValidationError;

/// Errors returned by the allocator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// The roster or criteria failed structural validation.
    #[error("invalid allocation input ({} issue(s))", .0.len())]
    InvalidInput(Vec<ValidationError>),

    /// A student produced by the role transform has no original record.
    #[error("student '{0}' from the role transform is missing from the roster")]
    UnknownStudent(StudentId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_error_messages() {
        let err = AllocationError::UnknownStudent(StudentId::Number(4));
        assert_eq!(
            err.to_string(),
            "student '4' from the role transform is missing from the roster"
        );

        let err = AllocationError::InvalidInput(vec![ValidationError::new(
            ValidationErrorKind::DuplicateId,
            "Duplicate student ID: 1",
        )]);
        assert_eq!(err.to_string(), "invalid allocation input (1 issue(s))");
    }
}
