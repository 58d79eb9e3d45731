//! Greedy allocator: mandatory-minimum seeding and remaining placement.
//!
//! # Algorithm
//!
//! **Phase 1.** For each criterion (scarcest first) and each team in
//! creation order, pull unassigned qualifying students (fewest enrollments
//! first) until the team meets the minimum. A conflicting student triggers
//! conflict resolution; if that fails it goes to the back of the queue.
//!
//! **Phase 2.** Every student still unassigned goes to the smallest team
//! that accepts it: no group conflict, and no criterion pushed past its
//! upper limit once the minimum is met. The upper limit is soft; when only
//! limits stand in the way, the smallest conflict-free team takes the
//! student. A strict Phase 2 would leave such a student unassigned; here
//! the limit only steers placement, so every conflict-free student is
//! placed. Re-sorting teams by size before each placement keeps sizes
//! close, though not at minimal variance.
//!
//! # Complexity
//! O(s × t × k) per phase, with s students, t teams and k team size.

use std::collections::VecDeque;

use tracing::debug;

use super::board::TeamBoard;
use super::conflict::{find_conflict, try_resolve_conflict, GroupConflict};

/// A student Phase 2 could not place.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Unplaced {
    pub student: usize,
    /// Last conflict seen, if a group clash was the reason.
    pub conflict: Option<GroupConflict>,
}

/// Places `student` in `team`, resolving a conflict first if needed.
fn place_with_resolution(
    board: &mut TeamBoard<'_>,
    student: usize,
    team: usize,
) -> Result<(), GroupConflict> {
    if let Some(conflict) = find_conflict(board, student, team) {
        if !try_resolve_conflict(board, student, team, &conflict) {
            return Err(conflict);
        }
        if let Some(remaining) = find_conflict(board, student, team) {
            return Err(remaining);
        }
    }
    board.assign(student, team);
    Ok(())
}

/// Phase 1: seeds every team up to each criterion's minimum.
pub(crate) fn seed_minimums(board: &mut TeamBoard<'_>, order: &[usize]) -> usize {
    let problem = board.problem();
    let mut placed = 0;

    for &c in order {
        let min = problem.criterion(c).min;
        let mut queue: Vec<usize> = (0..problem.student_count())
            .filter(|&s| !board.is_assigned(s) && problem.qualifies(s, c))
            .collect();
        queue.sort_by_key(|&s| problem.student(s).enrollment_count());
        let mut queue: VecDeque<usize> = queue.into();

        for team in 0..board.team_count() {
            if queue.is_empty() {
                break;
            }
            let mut attempts = queue.len();
            while board.count(team, c) < min && attempts > 0 {
                let Some(s) = queue.pop_front() else {
                    break;
                };
                attempts -= 1;
                if board.is_assigned(s) {
                    continue;
                }
                match place_with_resolution(board, s, team) {
                    Ok(()) => placed += 1,
                    Err(_) => queue.push_back(s),
                }
            }
        }
    }

    debug!(placed, "phase 1 complete");
    placed
}

/// Whether adding `student` to `team` breaks an upper limit of a criterion
/// that is already at its minimum.
pub(crate) fn breaches_upper_limit(board: &TeamBoard<'_>, student: usize, team: usize) -> bool {
    let problem = board.problem();
    problem.qualifying(student).iter().any(|&c| {
        let spec = problem.criterion(c);
        let count = board.count(team, c);
        count >= spec.min && count + 1 > spec.upper
    })
}

/// Phase 2: places every student still unassigned.
pub(crate) fn place_remaining(board: &mut TeamBoard<'_>) -> Vec<Unplaced> {
    let mut unplaced = Vec::new();
    let mut placed = 0;

    for student in board.unassigned() {
        let mut teams: Vec<usize> = (0..board.team_count()).collect();
        teams.sort_by_key(|&t| board.size(t));

        let mut last_conflict = None;
        let mut over_limit_fallback = None;
        let mut done = false;

        for &team in &teams {
            if let Some(conflict) = find_conflict(board, student, team) {
                let resolved = try_resolve_conflict(board, student, team, &conflict)
                    && find_conflict(board, student, team).is_none();
                if !resolved {
                    last_conflict = Some(conflict);
                    continue;
                }
            }
            if breaches_upper_limit(board, student, team) {
                over_limit_fallback.get_or_insert(team);
                continue;
            }
            board.assign(student, team);
            done = true;
            break;
        }

        if !done {
            if let Some(team) = over_limit_fallback {
                // Resolution on a later team may have moved someone in.
                if find_conflict(board, student, team).is_none() {
                    board.assign(student, team);
                    done = true;
                }
            }
        }

        if done {
            placed += 1;
        } else {
            unplaced.push(Unplaced {
                student,
                conflict: last_conflict,
            });
        }
    }

    debug!(placed, unplaced = unplaced.len(), "phase 2 complete");
    unplaced
}
