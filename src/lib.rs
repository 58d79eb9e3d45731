//! Quorum-constrained team allocation.
//!
//! Assigns a roster of students to a bounded number of teams so that every
//! team meets a minimum headcount per criterion (a subject, or a role
//! covered by several subjects) while students sharing a team share the
//! same course section ("group") for every common subject.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Student`, `SubjectGroup`, `Role`,
//!   `Team`, `Allocation`, `AssignmentWarning`
//! - **`criteria`**: Minimum configuration, upper limits, qualification counts
//! - **`allocator`**: Planner, greedy phases, local search, balancer, KPIs
//! - **`roles`**: Role ↔ virtual-subject transform
//! - **`config`**: Tuning parameters
//! - **`validation`**: Input integrity checks (duplicate IDs, ambiguous groups)
//! - **`error`**: `AllocationError`
//!
//! # Logging
//!
//! The engine emits `tracing` events (phase summaries at `debug`, run
//! summaries at `info`, pass-cap hits at `warn`). Install a subscriber in
//! the application to see them.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_team::allocator::{AllocationRequest, TeamAllocator};
//! use u_team::config::AllocationConfig;
//! use u_team::models::{CriteriaSelection, Role, Student};
//!
//! let students = vec![
//!     Arc::new(Student::new("s1").with_enrollment("Math", "A")),
//!     Arc::new(Student::new("s2").with_enrollment("Art", "X")),
//!     Arc::new(Student::new("s3").with_enrollment("Statistics", "S")),
//!     Arc::new(Student::new("s4").with_enrollment("Art", "X")),
//! ];
//! let roles = vec![
//!     Role::new("analyst").with_subject("Math").with_subject("Statistics"),
//!     Role::new("designer").with_subject("Art"),
//! ];
//! let request = AllocationRequest::new(students, CriteriaSelection::Roles(roles), 2);
//!
//! let allocation = TeamAllocator::new(AllocationConfig::default().with_seed(1))
//!     .allocate(&request)
//!     .unwrap();
//! assert_eq!(allocation.teams.len(), 2);
//! assert_eq!(allocation.assigned_count(), 4);
//! ```

pub mod allocator;
pub mod config;
pub mod criteria;
pub mod error;
pub mod models;
pub mod roles;
pub mod validation;
