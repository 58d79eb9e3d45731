//! Group-conflict detection and resolution.
//!
//! Two students may share a team only if they hold the same group for
//! every subject both take. A check costs O(team size × enrollments).

use tracing::debug;

use super::board::TeamBoard;

/// A group clash between a student and a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupConflict {
    /// Subject on which the groups differ.
    pub subject: String,
    /// Group held by the incoming student.
    pub student_group: String,
    /// Group already present in the team.
    pub team_group: String,
}

/// Finds a conflict between `student` and the current members of `team`.
pub(crate) fn find_conflict(
    board: &TeamBoard<'_>,
    student: usize,
    team: usize,
) -> Option<GroupConflict> {
    find_conflict_excluding(board, student, team, None)
}

/// Like [`find_conflict`], ignoring member `excluded` (a swap partner about
/// to leave `team`).
pub(crate) fn find_conflict_excluding(
    board: &TeamBoard<'_>,
    student: usize,
    team: usize,
    excluded: Option<usize>,
) -> Option<GroupConflict> {
    let problem = board.problem();
    let stays = |m: usize| m != student && Some(m) != excluded;

    for sg in &problem.student(student).enrollments {
        // A student's group for a subject is its first enrollment in it.
        let own = board
            .group_of(student, &sg.subject)
            .unwrap_or(sg.group.as_str());
        if let Some(committed) = board.commitment(team, &sg.subject) {
            if committed != own {
                // The lock goes away with the excluded member if nobody else backs it.
                let released = excluded.is_some()
                    && !board
                        .members(team)
                        .iter()
                        .any(|&m| stays(m) && board.group_of(m, &sg.subject) == Some(committed));
                if !released {
                    return Some(GroupConflict {
                        subject: sg.subject.clone(),
                        student_group: own.to_string(),
                        team_group: committed.to_string(),
                    });
                }
            }
        }

        for &m in board.members(team) {
            if !stays(m) {
                continue;
            }
            if let Some(g) = board.group_of(m, &sg.subject) {
                if g != own {
                    return Some(GroupConflict {
                        subject: sg.subject.clone(),
                        student_group: own.to_string(),
                        team_group: g.to_string(),
                    });
                }
            }
        }
    }
    None
}

/// Tries to clear `conflict` by relocating one blocking occupant of `target`.
///
/// Blocking occupants are the members holding `conflict.team_group` for
/// `conflict.subject`. The first one that fits into another team without a
/// new conflict is moved there. Returns `false` if none can be moved.
///
/// One relocation does not guarantee the conflict is gone (several members
/// may hold the blocking group); callers check again.
pub(crate) fn try_resolve_conflict(
    board: &mut TeamBoard<'_>,
    student: usize,
    target: usize,
    conflict: &GroupConflict,
) -> bool {
    let blockers: Vec<usize> = board
        .members(target)
        .iter()
        .copied()
        .filter(|&m| board.group_of(m, &conflict.subject) == Some(conflict.team_group.as_str()))
        .collect();

    for blocker in blockers {
        let destination = (0..board.team_count())
            .filter(|&t| t != target)
            .find(|&t| find_conflict(board, blocker, t).is_none());
        if let Some(dest) = destination {
            debug!(
                student,
                blocker,
                from = target + 1,
                to = dest + 1,
                subject = %conflict.subject,
                "relocated blocking student"
            );
            board.relocate(blocker, target, dest);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::problem::Problem;
    use crate::criteria::MinimumConfig;
    use crate::models::Student;
    use std::sync::Arc;

    fn roster() -> Vec<Arc<Student>> {
        vec![
            Arc::new(Student::new(1).with_enrollment("Math", "A")),
            Arc::new(Student::new(2).with_enrollment("Math", "B")),
            Arc::new(
                Student::new(3)
                    .with_enrollment("Math", "A")
                    .with_enrollment("Art", "X"),
            ),
            Arc::new(Student::new(4).with_enrollment("Art", "Y")),
            Arc::new(Student::new(5).with_enrollment("History", "H1")),
        ]
    }

    fn problem(students: &[Arc<Student>]) -> Problem<'_> {
        Problem::for_subjects(
            students,
            &["Math".into(), "Art".into()],
            &MinimumConfig::global(1),
            1,
        )
    }

    #[test]
    fn test_no_conflict_on_same_group() {
        let students = roster();
        let p = problem(&students);
        let mut board = TeamBoard::new(&p, 2);
        board.assign(0, 0);

        assert!(find_conflict(&board, 2, 0).is_none());
        assert!(find_conflict(&board, 4, 0).is_none());
    }

    #[test]
    fn test_conflict_reports_groups() {
        let students = roster();
        let p = problem(&students);
        let mut board = TeamBoard::new(&p, 2);
        board.assign(0, 0);

        let c = find_conflict(&board, 1, 0).unwrap();
        assert_eq!(c.subject, "Math");
        assert_eq!(c.student_group, "B");
        assert_eq!(c.team_group, "A");
    }

    #[test]
    fn test_conflict_on_non_criterion_subject() {
        let students = vec![
            Arc::new(Student::new(1).with_enrollment("History", "H1")),
            Arc::new(Student::new(2).with_enrollment("History", "H2")),
        ];
        let p = problem(&students);
        let mut board = TeamBoard::new(&p, 1);
        board.assign(0, 0);

        // No commitment for History, but the member scan still sees the clash.
        assert_eq!(board.commitment(0, "History"), None);
        let c = find_conflict(&board, 1, 0).unwrap();
        assert_eq!(c.subject, "History");
    }

    #[test]
    fn test_excluding_partner_releases_lock() {
        let students = roster();
        let p = problem(&students);
        let mut board = TeamBoard::new(&p, 2);
        board.assign(0, 0);

        assert!(find_conflict(&board, 1, 0).is_some());
        assert!(find_conflict_excluding(&board, 1, 0, Some(0)).is_none());

        board.assign(2, 0);
        // Student 3 still backs group A.
        assert!(find_conflict_excluding(&board, 1, 0, Some(0)).is_some());
    }

    #[test]
    fn test_resolve_moves_blocker() {
        let students = roster();
        let p = problem(&students);
        let mut board = TeamBoard::new(&p, 2);
        board.assign(0, 0);

        let conflict = find_conflict(&board, 1, 0).unwrap();
        assert!(try_resolve_conflict(&mut board, 1, 0, &conflict));
        assert_eq!(board.team_of(0), Some(1));
        assert!(find_conflict(&board, 1, 0).is_none());
    }

    #[test]
    fn test_resolve_fails_without_destination() {
        let students = roster();
        let p = problem(&students);
        let mut board = TeamBoard::new(&p, 2);
        board.assign(0, 0);
        board.assign(1, 1);

        // Team 2 holds Math B, so the Math A blocker cannot go there.
        let conflict = GroupConflict {
            subject: "Math".into(),
            student_group: "B".into(),
            team_group: "A".into(),
        };
        assert!(!try_resolve_conflict(&mut board, 1, 0, &conflict));
        assert_eq!(board.team_of(0), Some(0));
    }
}
