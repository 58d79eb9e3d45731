//! Warning synthesis for a finished board.

use std::collections::HashMap;

use super::board::TeamBoard;
use super::conflict::GroupConflict;
use super::planner::TeamPlan;
use crate::models::{Allocation, AssignmentWarning, Team, WarningsBuilder};

/// Builds the final allocation: drops empty teams and collects warnings.
pub(crate) fn synthesize(
    board: &TeamBoard<'_>,
    plan: &TeamPlan,
    conflicts: &HashMap<usize, GroupConflict>,
) -> Allocation {
    let problem = board.problem();
    let mut warnings = WarningsBuilder::new();

    for student in board.unassigned() {
        let label = problem.student(student).label();
        let warning = match conflicts.get(&student) {
            Some(conflict) => AssignmentWarning::critical(format!(
                "Student '{}' could not be placed: group '{}' of '{}' conflicts with every team",
                label,
                conflict.student_group,
                problem.label_of(&conflict.subject)
            ))
            .with_subject(conflict.subject.clone())
            .with_group(conflict.student_group.clone()),
            None => AssignmentWarning::critical(format!(
                "Student '{label}' could not be placed in any team"
            )),
        };
        warnings.push(warning);
    }

    let teams: Vec<Team> = board.to_teams();
    for (t, team) in teams.iter().enumerate() {
        if team.is_empty() {
            continue;
        }

        for (c, spec) in problem.criteria().iter().enumerate() {
            let count = board.count(t, c);
            if count == 0 {
                warnings.push(
                    AssignmentWarning::critical(format!(
                        "Team {} has no students for '{}' (needs {})",
                        team.id, spec.label, spec.min
                    ))
                    .with_team(team.id)
                    .with_subject(spec.id.clone()),
                );
            } else if count < spec.min {
                warnings.push(
                    AssignmentWarning::notice(format!(
                        "Team {} has {} of {} required students for '{}'",
                        team.id, count, spec.min, spec.label
                    ))
                    .with_team(team.id)
                    .with_subject(spec.id.clone()),
                );
            }
        }

        let mut seen: Vec<&str> = Vec::new();
        for member in &team.students {
            for sg in &member.enrollments {
                if seen.contains(&sg.subject.as_str()) {
                    continue;
                }
                seen.push(&sg.subject);
                let groups = team.groups_for(&sg.subject);
                if groups.len() > 1 {
                    let joined = groups.join(", ");
                    warnings.push(
                        AssignmentWarning::critical(format!(
                            "Team {} mixes groups {} of '{}'",
                            team.id,
                            joined,
                            problem.label_of(&sg.subject)
                        ))
                        .with_team(team.id)
                        .with_subject(sg.subject.clone())
                        .with_group(joined),
                    );
                }
            }
        }
    }

    let teams: Vec<Team> = teams.into_iter().filter(|t| !t.is_empty()).collect();
    if teams.len() < plan.requested_team_count {
        let mut message = format!(
            "Only {} of {} requested teams could be formed",
            teams.len(),
            plan.requested_team_count
        );
        if let Some(c) = plan.bottleneck_index {
            let spec = problem.criterion(c);
            message.push_str(&format!(
                " (limited by '{}': {} students, {} per team)",
                spec.label, plan.students_per_criterion[c], spec.min
            ));
        }
        warnings.push(AssignmentWarning::notice(message));
    }

    Allocation {
        teams,
        warnings: warnings.finish(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::planner::{plan, Feasibility};
    use crate::allocator::problem::Problem;
    use crate::criteria::MinimumConfig;
    use crate::models::Student;
    use std::sync::Arc;

    fn student(id: i64, enrollments: &[(&str, &str)]) -> Arc<Student> {
        let mut s = Student::new(id);
        for (subject, group) in enrollments {
            s = s.with_enrollment(*subject, *group);
        }
        Arc::new(s)
    }

    fn feasible(p: &Problem<'_>, teams: usize) -> TeamPlan {
        match plan(p, teams) {
            Feasibility::Feasible(plan) => plan,
            Feasibility::Infeasible(w) => panic!("unexpected infeasibility: {}", w.message),
        }
    }

    #[test]
    fn test_missing_and_short_quotas() {
        let roster = vec![
            student(0, &[("Math", "A")]),
            student(1, &[("Math", "A")]),
            student(2, &[("Art", "X")]),
            student(3, &[("Art", "X")]),
        ];
        let subjects = vec!["Math".to_string(), "Art".to_string()];
        let p = Problem::for_subjects(&roster, &subjects, &MinimumConfig::global(2), 1);
        let team_plan = feasible(&p, 1);
        let mut board = TeamBoard::new(&p, 2);
        board.assign(0, 0);
        board.assign(1, 0);
        board.assign(2, 0);
        board.assign(3, 1);

        let alloc = synthesize(&board, &team_plan, &HashMap::new());
        assert_eq!(alloc.teams.len(), 2);
        let critical: Vec<_> = alloc.warnings.iter().filter(|w| w.is_critical).collect();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].team, Some(2));
        assert_eq!(critical[0].subject.as_deref(), Some("Math"));

        let notices: Vec<_> = alloc.warnings.iter().filter(|w| !w.is_critical).collect();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|w| w.subject.as_deref() == Some("Art")));
        // Critical warnings are listed first.
        assert!(alloc.warnings[0].is_critical);
    }

    #[test]
    fn test_unassigned_with_conflict() {
        let roster = vec![
            student(0, &[("Math", "A")]),
            student(1, &[("Math", "B")]),
        ];
        let p = Problem::for_subjects(&roster, &["Math".into()], &MinimumConfig::global(1), 1);
        let team_plan = feasible(&p, 1);
        let mut board = TeamBoard::new(&p, 1);
        board.assign(0, 0);

        let mut conflicts = HashMap::new();
        conflicts.insert(
            1,
            GroupConflict {
                subject: "Math".into(),
                student_group: "B".into(),
                team_group: "A".into(),
            },
        );
        let alloc = synthesize(&board, &team_plan, &conflicts);
        let w = &alloc.warnings[0];
        assert!(w.is_critical);
        assert_eq!(w.team, None);
        assert_eq!(w.subject.as_deref(), Some("Math"));
        assert_eq!(w.group.as_deref(), Some("B"));
        assert!(w.message.contains("conflicts"));
    }

    #[test]
    fn test_empty_teams_dropped_and_reported() {
        let roster = vec![student(0, &[("Math", "A")]), student(1, &[("Math", "A")])];
        let p = Problem::for_subjects(&roster, &["Math".into()], &MinimumConfig::global(1), 1);
        let team_plan = feasible(&p, 3);
        let mut board = TeamBoard::new(&p, 3);
        board.assign(0, 0);
        board.assign(1, 2);

        let alloc = synthesize(&board, &team_plan, &HashMap::new());
        let ids: Vec<u32> = alloc.teams.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        let reduced = alloc
            .warnings
            .iter()
            .find(|w| w.message.starts_with("Only 2 of 3"))
            .unwrap();
        assert!(!reduced.is_critical);
        assert!(reduced.message.contains("limited by 'Math'"));
    }

    #[test]
    fn test_mixed_groups_flagged() {
        let roster = vec![student(0, &[("Math", "A")]), student(1, &[("Math", "B")])];
        let p = Problem::for_subjects(&roster, &["Math".into()], &MinimumConfig::global(1), 1);
        let team_plan = feasible(&p, 1);
        let mut board = TeamBoard::new(&p, 1);
        board.assign(0, 0);
        board.assign(1, 0);

        let alloc = synthesize(&board, &team_plan, &HashMap::new());
        let mixed = alloc
            .warnings
            .iter()
            .find(|w| w.message.contains("mixes groups"))
            .unwrap();
        assert!(mixed.is_critical);
        assert_eq!(mixed.group.as_deref(), Some("A, B"));
    }
}
