//! Allocation domain models.
//!
//! Provides the data types for describing a roster, the quota criteria
//! teams are measured against, and the resulting teams and warnings.
//!
//! # Domain Mappings
//!
//! | u-team | Classroom | Hackathon | Clinical rotation |
//! |--------|-----------|-----------|-------------------|
//! | Student | Student | Participant | Resident |
//! | SubjectGroup | Course section | Track cohort | Ward shift |
//! | Role | Project role | Skill profile | Specialty |
//! | Team | Project team | Squad | Rotation team |

mod role;
mod student;
mod team;
mod warning;

pub use role::{CriteriaSelection, Criterion, Role};
pub use student::{Student, StudentId, SubjectGroup};
pub use team::{Allocation, Team};
pub use warning::{AssignmentWarning, WarningsBuilder};
