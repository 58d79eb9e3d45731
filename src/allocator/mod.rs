//! Team allocation engine.
//!
//! # Components
//!
//! | Module | Role |
//! |--------|------|
//! | `planner` | Feasible team count, bottleneck, scarcest-first order |
//! | `board` | Team membership and group commitments; the only mutation point |
//! | `conflict` | Group-conflict detection and blocker relocation |
//! | `greedy` | Phase 1 minimum seeding, Phase 2 remaining placement |
//! | `local_search` | Randomized pairwise swap improvement |
//! | `balancer` | Deterministic surplus/deficit and upper-limit passes |
//! | `report` | Empty-team removal and warning synthesis |
//! | `kpi` | Quality metrics of a finished allocation |
//!
//! Students and criteria are addressed by index inside a run; teams hold
//! shared `Arc<Student>` handles only once the run is materialized.

mod balancer;
mod board;
mod commitment;
mod conflict;
mod engine;
mod greedy;
mod kpi;
mod local_search;
mod planner;
pub(crate) mod problem;
mod report;

pub use engine::{AllocationRequest, TeamAllocator};
pub use kpi::AllocationKpi;
pub use planner::{Feasibility, TeamPlan};
