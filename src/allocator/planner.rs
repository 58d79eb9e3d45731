//! Feasibility and ordering planner.
//!
//! # Algorithm
//!
//! For each criterion `c` with `n_c` qualifying students and minimum `m_c`:
//!
//! 1. `n_c < m_c` (including `n_c = 0`) → no team can ever meet `c`; the
//!    run ends with one critical warning.
//! 2. Otherwise `c` supports at most `floor(n_c / m_c)` teams.
//!
//! The effective team count is the smallest of these bounds and the
//! requested count. Criteria are then ordered scarcest first, so the most
//! constrained quota is seeded before the others compete for students.

use tracing::debug;

use super::problem::Problem;
use crate::criteria::scarcity_order;
use crate::models::AssignmentWarning;

/// Outcome of a feasible plan.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamPlan {
    /// Team count the caller asked for.
    pub requested_team_count: usize,
    /// Team count that can meet every criterion's minimum.
    pub effective_team_count: usize,
    /// Criterion id limiting the team count below the request, if any.
    pub bottleneck: Option<String>,
    /// Criterion ids in processing order (scarcest first).
    pub order: Vec<String>,
    /// Qualifying students per criterion, in input order.
    pub students_per_criterion: Vec<usize>,
    pub(crate) order_indices: Vec<usize>,
    pub(crate) bottleneck_index: Option<usize>,
}

impl TeamPlan {
    /// Whether fewer teams than requested will be formed.
    pub fn is_reduced(&self) -> bool {
        self.effective_team_count < self.requested_team_count
    }
}

/// Feasibility verdict for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Feasibility {
    /// At least one team can be formed.
    Feasible(TeamPlan),
    /// Some criterion cannot be met by any team.
    Infeasible(AssignmentWarning),
}

/// Plans the team count and criterion order for `problem`.
pub(crate) fn plan(problem: &Problem<'_>, requested_team_count: usize) -> Feasibility {
    let students_per_criterion = problem.students_per_criterion();

    let mut effective = requested_team_count;
    let mut bottleneck = None;

    for (c, &available) in students_per_criterion.iter().enumerate() {
        let spec = problem.criterion(c);
        if available < spec.min {
            let message = if available == 0 {
                format!("No students qualify for '{}'", spec.label)
            } else {
                format!(
                    "Not enough students for '{}': {} available, each team needs {}",
                    spec.label, available, spec.min
                )
            };
            return Feasibility::Infeasible(
                AssignmentWarning::critical(message).with_subject(spec.id.clone()),
            );
        }

        let max_teams = available / spec.min;
        if max_teams < effective {
            effective = max_teams;
            bottleneck = Some(c);
        }
    }

    let order_indices = scarcity_order(&students_per_criterion);
    debug!(
        requested = requested_team_count,
        effective,
        bottleneck = bottleneck.map(|c| problem.criterion(c).id.as_str()),
        "team plan"
    );

    Feasibility::Feasible(TeamPlan {
        requested_team_count,
        effective_team_count: effective,
        bottleneck: bottleneck.map(|c| problem.criterion(c).id.clone()),
        order: order_indices
            .iter()
            .map(|&c| problem.criterion(c).id.clone())
            .collect(),
        students_per_criterion,
        order_indices,
        bottleneck_index: bottleneck,
    })
}
