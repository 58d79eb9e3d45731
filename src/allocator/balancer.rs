//! Final balancer: deterministic redistribution passes.
//!
//! # Passes
//!
//! 1. **Meet minimums**: move qualifying students from teams above a
//!    criterion's minimum to teams below it.
//! 2. **Respect upper limits**: move qualifying students out of teams above
//!    the upper limit into teams below it.
//!
//! A move is skipped when it would drop the source below the minimum of
//! another criterion the student covers, or when it would create a group
//! conflict at the destination. Donors always stay at or above the minimum
//! and recipients only gain members, so no `(team, criterion)` pair that
//! met its minimum loses it.
//!
//! Pass caps (`teams × criteria × 3` and `teams × criteria`) only guarantee
//! termination; hitting one is logged.

use tracing::{debug, warn};

use super::board::TeamBoard;
use super::conflict::find_conflict;

/// Moves made by the balancer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct BalanceOutcome {
    pub minimum_moves: usize,
    pub upper_limit_moves: usize,
}

/// Whether removing `student` from `source` keeps every criterion other than
/// `moving_for` at its minimum.
fn keeps_other_minimums(
    board: &TeamBoard<'_>,
    student: usize,
    source: usize,
    moving_for: usize,
) -> bool {
    let problem = board.problem();
    problem.qualifying(student).iter().all(|&c| {
        if c == moving_for {
            return true;
        }
        let min = problem.criterion(c).min;
        let count = board.count(source, c);
        !(count >= min && count - 1 < min)
    })
}

/// Whether adding `student` to `dest` pushes another covered criterion past
/// its upper limit.
fn overfills_other_criteria(
    board: &TeamBoard<'_>,
    student: usize,
    dest: usize,
    moving_for: usize,
) -> bool {
    let problem = board.problem();
    problem.qualifying(student).iter().any(|&c| {
        let spec = problem.criterion(c);
        let count = board.count(dest, c);
        c != moving_for && count >= spec.min && count + 1 > spec.upper
    })
}

/// First qualifying member of `source` that may move to `dest` for criterion `c`.
fn movable_member(
    board: &TeamBoard<'_>,
    c: usize,
    source: usize,
    dest: usize,
    check_overfill: bool,
) -> Option<usize> {
    let problem = board.problem();
    board.members(source).iter().copied().find(|&s| {
        problem.qualifies(s, c)
            && keeps_other_minimums(board, s, source, c)
            && !(check_overfill && overfills_other_criteria(board, s, dest, c))
            && find_conflict(board, s, dest).is_none()
    })
}

fn meet_minimums(board: &mut TeamBoard<'_>) -> usize {
    let problem = board.problem();
    let team_count = board.team_count();
    let cap = (team_count * problem.criterion_count() * 3).max(1);
    let mut moves = 0;
    let mut passes = 0;

    loop {
        if passes >= cap {
            warn!(cap, "minimum balancing hit its pass cap");
            break;
        }
        passes += 1;
        let mut moved = false;

        for c in 0..problem.criterion_count() {
            let min = problem.criterion(c).min;
            for dest in 0..team_count {
                while board.count(dest, c) < min {
                    let donor = (0..team_count)
                        .filter(|&src| src != dest && board.count(src, c) > min)
                        .find_map(|src| {
                            movable_member(board, c, src, dest, false).map(|s| (s, src))
                        });
                    let Some((student, src)) = donor else {
                        break;
                    };
                    board.relocate(student, src, dest);
                    moves += 1;
                    moved = true;
                }
            }
        }

        if !moved {
            break;
        }
    }
    moves
}

fn respect_upper_limits(board: &mut TeamBoard<'_>) -> usize {
    let problem = board.problem();
    let team_count = board.team_count();
    let cap = (team_count * problem.criterion_count()).max(1);
    let mut moves = 0;
    let mut passes = 0;

    loop {
        if passes >= cap {
            warn!(cap, "upper-limit balancing hit its pass cap");
            break;
        }
        passes += 1;
        let mut moved = false;

        for c in 0..problem.criterion_count() {
            let upper = problem.criterion(c).upper;
            for src in 0..team_count {
                while board.count(src, c) > upper {
                    let target = (0..team_count)
                        .filter(|&dest| dest != src && board.count(dest, c) < upper)
                        .find_map(|dest| {
                            movable_member(board, c, src, dest, true).map(|s| (s, dest))
                        });
                    let Some((student, dest)) = target else {
                        break;
                    };
                    board.relocate(student, src, dest);
                    moves += 1;
                    moved = true;
                }
            }
        }

        if !moved {
            break;
        }
    }
    moves
}

/// Runs both balancing passes.
pub(crate) fn balance(board: &mut TeamBoard<'_>) -> BalanceOutcome {
    let outcome = BalanceOutcome {
        minimum_moves: meet_minimums(board),
        upper_limit_moves: respect_upper_limits(board),
    };
    debug!(
        minimum_moves = outcome.minimum_moves,
        upper_limit_moves = outcome.upper_limit_moves,
        satisfied_pairs = board.satisfied_pairs(),
        "final balancing complete"
    );
    outcome
}
