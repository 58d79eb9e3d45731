//! Allocation quality metrics (KPIs).
//!
//! Computes summary indicators from a finished allocation, its roster and
//! the criteria it was built for.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Team count | Teams in the allocation |
//! | Assigned / unassigned | Roster students placed / not placed |
//! | Size range | Smallest and largest team |
//! | Mean size | Assigned students / teams |
//! | Size std dev | Population standard deviation of team sizes |
//! | Compliance rate | Fraction of `(team, criterion)` pairs at or above the minimum |

use std::sync::Arc;

use crate::criteria::{count_students_with_role, count_students_with_subject, MinimumConfig};
use crate::models::{Allocation, CriteriaSelection, Criterion, Student, Team};

/// Allocation performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationKpi {
    /// Teams in the allocation.
    pub team_count: usize,
    /// Students placed in some team.
    pub assigned_students: usize,
    /// Roster students not placed in any team.
    pub unassigned_students: usize,
    /// Size of the smallest team (0 without teams).
    pub min_team_size: usize,
    /// Size of the largest team (0 without teams).
    pub max_team_size: usize,
    /// Assigned students per team.
    pub mean_team_size: f64,
    /// Population standard deviation of team sizes.
    pub team_size_std_dev: f64,
    /// Fraction of `(team, criterion)` pairs meeting the minimum (0.0..1.0).
    pub compliance_rate: f64,
}

impl AllocationKpi {
    /// Computes KPIs for `allocation`.
    ///
    /// # Arguments
    /// * `allocation` - The finished allocation.
    /// * `students` - The roster the allocation was built from.
    /// * `criteria` - The criteria selection of the request.
    /// * `minimums` - The minimum configuration of the request.
    pub fn calculate(
        allocation: &Allocation,
        students: &[Arc<Student>],
        criteria: &CriteriaSelection,
        minimums: &MinimumConfig,
    ) -> Self {
        let sizes: Vec<usize> = allocation.teams.iter().map(|t| t.size()).collect();
        let team_count = sizes.len();
        let assigned = allocation.assigned_count();

        let (mean, std_dev) = if team_count == 0 {
            (0.0, 0.0)
        } else {
            let mean = assigned as f64 / team_count as f64;
            let variance = sizes
                .iter()
                .map(|&s| (s as f64 - mean).powi(2))
                .sum::<f64>()
                / team_count as f64;
            (mean, variance.sqrt())
        };

        let criteria = criteria.criteria();
        let mut pairs = 0usize;
        let mut compliant = 0usize;
        for team in &allocation.teams {
            for criterion in &criteria {
                pairs += 1;
                if criterion_count(team, criterion) >= minimums.minimum_for(criterion) {
                    compliant += 1;
                }
            }
        }

        // No pairs → nothing to violate
        let compliance_rate = if pairs == 0 {
            1.0
        } else {
            compliant as f64 / pairs as f64
        };

        Self {
            team_count,
            assigned_students: assigned,
            unassigned_students: allocation.unassigned_students(students).len(),
            min_team_size: sizes.iter().copied().min().unwrap_or(0),
            max_team_size: sizes.iter().copied().max().unwrap_or(0),
            mean_team_size: mean,
            team_size_std_dev: std_dev,
            compliance_rate,
        }
    }

    /// Largest minus smallest team size.
    pub fn size_spread(&self) -> usize {
        self.max_team_size - self.min_team_size
    }

    /// Whether the allocation meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_size_spread: usize, min_compliance: f64) -> bool {
        self.size_spread() <= max_size_spread && self.compliance_rate >= min_compliance
    }
}

fn criterion_count(team: &Team, criterion: &Criterion) -> usize {
    match criterion {
        Criterion::Subject(subject) => count_students_with_subject(team, subject),
        Criterion::Role(role) => count_students_with_role(team, role),
    }
}
