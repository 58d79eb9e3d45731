//! Allocation pipeline entry point.
//!
//! # Pipeline
//!
//! 1. Validate the roster and criteria.
//! 2. Plan: feasibility and scarcest-first criterion order.
//! 3. Phase 1: seed every team up to each minimum.
//! 4. Phase 2: place everyone else.
//! 5. Local search: randomized pairwise swaps.
//! 6. Final balancing: surplus to deficit, over-limit to under-limit.
//! 7. Drop empty teams and synthesize warnings.
//!
//! Role mode runs the same pipeline on virtual subjects
//! (see [`RoleTransform`](crate::roles::RoleTransform)).

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument};

use super::balancer::balance;
use super::board::TeamBoard;
use super::greedy::{place_remaining, seed_minimums};
use super::local_search::{optimize, SwapSearch};
use super::planner::{self, Feasibility};
use super::problem::Problem;
use super::report::synthesize;
use crate::config::AllocationConfig;
use crate::criteria::MinimumConfig;
use crate::error::AllocationError;
use crate::models::{Allocation, AssignmentWarning, CriteriaSelection, Student};
use crate::roles::RoleTransform;
use crate::validation::validate_input;

/// Input container for one allocation run.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    /// Students to place.
    pub students: Vec<Arc<Student>>,
    /// Subjects or roles to meet.
    pub criteria: CriteriaSelection,
    /// Requested number of teams.
    pub team_count: usize,
    /// Per-team minimums.
    pub minimums: MinimumConfig,
}

impl AllocationRequest {
    /// Creates a request with the default minimum (global 1).
    pub fn new(
        students: Vec<Arc<Student>>,
        criteria: CriteriaSelection,
        team_count: usize,
    ) -> Self {
        Self {
            students,
            criteria,
            team_count,
            minimums: MinimumConfig::default(),
        }
    }

    /// Sets the minimum configuration.
    pub fn with_minimums(mut self, minimums: MinimumConfig) -> Self {
        self.minimums = minimums;
        self
    }
}

/// Quorum-constrained team allocator.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use u_team::allocator::{AllocationRequest, TeamAllocator};
/// use u_team::config::AllocationConfig;
/// use u_team::criteria::MinimumConfig;
/// use u_team::models::{CriteriaSelection, Student};
///
/// let students: Vec<_> = (1..=6)
///     .map(|i| Arc::new(Student::new(i).with_enrollment("Math", "A")))
///     .collect();
/// let request = AllocationRequest::new(
///     students,
///     CriteriaSelection::Subjects(vec!["Math".into()]),
///     2,
/// )
/// .with_minimums(MinimumConfig::global(2));
///
/// let allocator = TeamAllocator::new(AllocationConfig::default().with_seed(42));
/// let allocation = allocator.allocate(&request).unwrap();
/// assert_eq!(allocation.teams.len(), 2);
/// assert!(allocation.teams.iter().all(|t| t.size() == 3));
/// assert!(!allocation.has_critical_warnings());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TeamAllocator {
    config: AllocationConfig,
}

impl TeamAllocator {
    /// Creates an allocator with the given tuning parameters.
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    /// Tuning parameters in use.
    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Runs the allocation with the configured seed, or OS entropy if none.
    ///
    /// # Errors
    /// See [`allocate_with_rng`](Self::allocate_with_rng).
    #[instrument(skip_all, fields(students = request.students.len(), teams = request.team_count))]
    pub fn allocate(&self, request: &AllocationRequest) -> Result<Allocation, AllocationError> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.allocate_with_rng(request, &mut rng)
    }

    /// Runs the allocation, drawing local-search randomness from `rng`.
    ///
    /// Infeasible quotas and empty inputs are not errors: they return an
    /// allocation with zero teams and one critical warning.
    ///
    /// # Errors
    /// - [`AllocationError::InvalidInput`] if validation fails.
    /// - [`AllocationError::UnknownStudent`] if role mode cannot map a
    ///   member back to the roster.
    pub fn allocate_with_rng<R: Rng + ?Sized>(
        &self,
        request: &AllocationRequest,
        rng: &mut R,
    ) -> Result<Allocation, AllocationError> {
        validate_input(&request.students, &request.criteria)
            .map_err(AllocationError::InvalidInput)?;
        if let Some(warning) = boundary_warning(request) {
            return Ok(Allocation::failed(warning));
        }

        match &request.criteria {
            CriteriaSelection::Subjects(subjects) => {
                let problem = Problem::for_subjects(
                    &request.students,
                    subjects,
                    &request.minimums,
                    self.config.upper_limit_offset,
                );
                Ok(self.run(&problem, request.team_count, rng))
            }
            CriteriaSelection::Roles(roles) => {
                let transform = RoleTransform::new(&request.students, roles, &request.minimums);
                let problem = transform.problem(self.config.upper_limit_offset);
                let allocation = self.run(&problem, request.team_count, rng);
                transform.restore(allocation, &request.students)
            }
        }
    }

    /// Plans a request without allocating: effective team count, bottleneck
    /// and criterion order.
    ///
    /// Boundary inputs come back as [`Feasibility::Infeasible`].
    ///
    /// # Errors
    /// [`AllocationError::InvalidInput`] if validation fails.
    pub fn plan(&self, request: &AllocationRequest) -> Result<Feasibility, AllocationError> {
        validate_input(&request.students, &request.criteria)
            .map_err(AllocationError::InvalidInput)?;
        if let Some(warning) = boundary_warning(request) {
            return Ok(Feasibility::Infeasible(warning));
        }

        let offset = self.config.upper_limit_offset;
        let feasibility = match &request.criteria {
            CriteriaSelection::Subjects(subjects) => {
                let problem =
                    Problem::for_subjects(&request.students, subjects, &request.minimums, offset);
                planner::plan(&problem, request.team_count)
            }
            CriteriaSelection::Roles(roles) => {
                let transform = RoleTransform::new(&request.students, roles, &request.minimums);
                let problem = transform.problem(offset);
                match planner::plan(&problem, request.team_count) {
                    Feasibility::Infeasible(w) => {
                        Feasibility::Infeasible(transform.restore_warning(w))
                    }
                    feasible => feasible,
                }
            }
        };
        Ok(feasibility)
    }

    pub(crate) fn run<R: Rng + ?Sized>(
        &self,
        problem: &Problem<'_>,
        team_count: usize,
        rng: &mut R,
    ) -> Allocation {
        let team_plan = match planner::plan(problem, team_count) {
            Feasibility::Feasible(plan) => plan,
            Feasibility::Infeasible(warning) => {
                info!(reason = %warning.message, "allocation infeasible");
                return Allocation::failed(warning);
            }
        };

        let mut board = TeamBoard::new(problem, team_plan.effective_team_count);
        seed_minimums(&mut board, &team_plan.order_indices);
        let unplaced = place_remaining(&mut board);

        let search = SwapSearch {
            max_iterations: self.config.max_iterations,
            acceptance_threshold: self.config.acceptance_threshold,
        };
        let swaps = optimize(&mut board, search, rng);
        let moves = balance(&mut board);
        debug_assert!(board.is_group_consistent());

        let conflicts: HashMap<_, _> = unplaced
            .into_iter()
            .filter_map(|u| u.conflict.map(|c| (u.student, c)))
            .collect();
        let allocation = synthesize(&board, &team_plan, &conflicts);

        info!(
            teams = allocation.teams.len(),
            assigned = board.assigned_count(),
            unassigned = problem.student_count() - board.assigned_count(),
            swaps,
            balance_moves = moves.minimum_moves + moves.upper_limit_moves,
            warnings = allocation.warnings.len(),
            "allocation complete"
        );
        allocation
    }
}

/// Critical warning for inputs that cannot form any team.
fn boundary_warning(request: &AllocationRequest) -> Option<AssignmentWarning> {
    let message = if request.students.is_empty() {
        "No students to allocate"
    } else if request.criteria.is_empty() {
        "No subjects or roles selected"
    } else if request.team_count == 0 {
        "Requested team count must be at least 1"
    } else {
        return None;
    };
    Some(AssignmentWarning::critical(message))
}
