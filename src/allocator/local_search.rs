//! Local search: randomized pairwise swap improvement.
//!
//! # Algorithm
//!
//! Each pass shuffles all team pairs and looks for students `a ∈ A`,
//! `b ∈ B` that can trade places. Both moves must be conflict-free (the
//! outgoing partner does not count) and must not push a criterion past its
//! upper limit. The swap is taken only when
//! `score(a: A→B) + score(b: B→A) < threshold`. The first accepted swap
//! ends the pass; a pass without a swap ends the search.
//!
//! # Move score (lower is better)
//!
//! | Term | Value |
//! |------|-------|
//! | size balance | `Σ |after − avg| − |before − avg|` over source and target |
//! | source drops below minimum | +10 |
//! | target newly reaches minimum | −10 |
//! | target exceeds upper limit while at/above minimum | +7 |
//! | source resolves an upper-limit violation | −3 |

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::board::TeamBoard;
use super::conflict::find_conflict_excluding;

const BELOW_MINIMUM_PENALTY: f64 = 10.0;
const REACHES_MINIMUM_BONUS: f64 = -10.0;
const OVER_LIMIT_PENALTY: f64 = 7.0;
const RESOLVES_LIMIT_BONUS: f64 = -3.0;

/// Swap search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SwapSearch {
    pub max_iterations: usize,
    pub acceptance_threshold: f64,
}

/// Score of moving `student` from `source` to `target`.
pub(crate) fn move_score(
    board: &TeamBoard<'_>,
    student: usize,
    source: usize,
    target: usize,
    avg: f64,
) -> f64 {
    let problem = board.problem();
    let src_size = board.size(source) as f64;
    let dst_size = board.size(target) as f64;
    let mut score = ((src_size - 1.0 - avg).abs() - (src_size - avg).abs())
        + ((dst_size + 1.0 - avg).abs() - (dst_size - avg).abs());

    for &c in problem.qualifying(student) {
        let spec = problem.criterion(c);
        let src = board.count(source, c);
        let dst = board.count(target, c);
        if src >= spec.min && src - 1 < spec.min {
            score += BELOW_MINIMUM_PENALTY;
        }
        if dst < spec.min && dst + 1 >= spec.min {
            score += REACHES_MINIMUM_BONUS;
        }
        if dst >= spec.min && dst + 1 > spec.upper {
            score += OVER_LIMIT_PENALTY;
        }
        if src > spec.upper && src - 1 <= spec.upper {
            score += RESOLVES_LIMIT_BONUS;
        }
    }
    score
}

/// Whether `student` can join `target` while `partner` leaves it.
fn can_move(board: &TeamBoard<'_>, student: usize, target: usize, partner: usize) -> bool {
    if find_conflict_excluding(board, student, target, Some(partner)).is_some() {
        return false;
    }
    let problem = board.problem();
    problem.qualifying(student).iter().all(|&c| {
        let spec = problem.criterion(c);
        let count = board.count(target, c) - usize::from(problem.qualifies(partner, c));
        !(count >= spec.min && count + 1 > spec.upper)
    })
}

fn swap(board: &mut TeamBoard<'_>, a: usize, team_a: usize, b: usize, team_b: usize) {
    board.remove(a, team_a);
    board.remove(b, team_b);
    board.assign(a, team_b);
    board.assign(b, team_a);
}

/// Finds and applies the first acceptable swap between `team_a` and `team_b`.
fn try_swap(
    board: &mut TeamBoard<'_>,
    team_a: usize,
    team_b: usize,
    avg: f64,
    threshold: f64,
) -> bool {
    let members_a = board.members(team_a).to_vec();
    let members_b = board.members(team_b).to_vec();

    for &a in &members_a {
        for &b in &members_b {
            if !can_move(board, a, team_b, b) || !can_move(board, b, team_a, a) {
                continue;
            }
            let score = move_score(board, a, team_a, team_b, avg)
                + move_score(board, b, team_b, team_a, avg);
            if score < threshold {
                debug!(
                    a,
                    b,
                    team_a = team_a + 1,
                    team_b = team_b + 1,
                    score,
                    "swap accepted"
                );
                swap(board, a, team_a, b, team_b);
                return true;
            }
        }
    }
    false
}

/// Runs the swap search. Returns the number of swaps applied.
pub(crate) fn optimize<R: Rng + ?Sized>(
    board: &mut TeamBoard<'_>,
    params: SwapSearch,
    rng: &mut R,
) -> usize {
    let team_count = board.team_count();
    if team_count < 2 {
        return 0;
    }
    let avg = board.assigned_count() as f64 / team_count as f64;

    let mut pairs: Vec<(usize, usize)> = (0..team_count)
        .flat_map(|a| ((a + 1)..team_count).map(move |b| (a, b)))
        .collect();

    let mut swaps = 0;
    for _ in 0..params.max_iterations {
        pairs.shuffle(rng);
        let swapped = pairs.iter().any(|&(a, b)| {
            board.size(a) > 0
                && board.size(b) > 0
                && try_swap(board, a, b, avg, params.acceptance_threshold)
        });
        if !swapped {
            break;
        }
        swaps += 1;
    }

    debug!(swaps, "local search complete");
    swaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::problem::Problem;
    use crate::criteria::MinimumConfig;
    use crate::models::Student;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn student(id: i64, enrollments: &[(&str, &str)]) -> Arc<Student> {
        let mut s = Student::new(id);
        for (subject, group) in enrollments {
            s = s.with_enrollment(*subject, *group);
        }
        Arc::new(s)
    }

    fn params() -> SwapSearch {
        SwapSearch {
            max_iterations: 50,
            acceptance_threshold: -0.1,
        }
    }

    #[test]
    fn test_move_score_penalties() {
        let roster = vec![
            student(0, &[("Math", "A")]),
            student(1, &[("Math", "A")]),
            student(2, &[("Art", "X")]),
        ];
        let p = Problem::for_subjects(
            &roster,
            &["Math".into(), "Art".into()],
            &MinimumConfig::global(1),
            1,
        );
        let mut board = TeamBoard::new(&p, 2);
        board.assign(0, 0);
        board.assign(1, 0);
        board.assign(2, 1);

        // Math: source 2 → 1 (still at minimum), target 0 → 1 (reaches minimum).
        // Sizes 2,1 avg 1.5: (|0.5| − |0.5|) + (|0.5| − |0.5|) = 0.
        let score = move_score(&board, 0, 0, 1, 1.5);
        assert!((score - REACHES_MINIMUM_BONUS).abs() < 1e-9);

        // Art from team 2 to 1: source drops below minimum, size spread grows.
        let score = move_score(&board, 2, 1, 0, 1.5);
        assert!((score - (2.0 + BELOW_MINIMUM_PENALTY - 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_swap_repairs_missing_quota() {
        // Team 1 has both Art students, team 2 has none.
        let roster = vec![
            student(0, &[("Math", "A")]),
            student(1, &[("Art", "X")]),
            student(2, &[("Math", "A")]),
            student(3, &[("Art", "X")]),
        ];
        let p = Problem::for_subjects(
            &roster,
            &["Math".into(), "Art".into()],
            &MinimumConfig::global(1),
            1,
        );
        let mut board = TeamBoard::new(&p, 2);
        board.assign(0, 0);
        board.assign(1, 0);
        board.assign(3, 0);
        board.assign(2, 1);
        board.remove(0, 0);
        board.assign(0, 1);

        let mut rng = SmallRng::seed_from_u64(7);
        let swaps = optimize(&mut board, params(), &mut rng);
        assert!(swaps >= 1);
        assert!(board.count(0, 1) >= 1);
        assert!(board.count(1, 1) >= 1);
        assert!(board.is_group_consistent());
    }

    #[test]
    fn test_balanced_board_is_left_alone() {
        let roster: Vec<_> = (0..6).map(|i| student(i, &[("Math", "A")])).collect();
        let p = Problem::for_subjects(&roster, &["Math".into()], &MinimumConfig::global(2), 1);
        let mut board = TeamBoard::new(&p, 2);
        for s in 0..3 {
            board.assign(s, 0);
        }
        for s in 3..6 {
            board.assign(s, 1);
        }

        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(optimize(&mut board, params(), &mut rng), 0);
        assert_eq!(board.size(0), 3);
        assert_eq!(board.size(1), 3);
    }

    #[test]
    fn test_swaps_never_break_consistency() {
        let roster = vec![
            student(0, &[("Math", "A"), ("Art", "X")]),
            student(1, &[("Math", "B")]),
            student(2, &[("Art", "Y")]),
            student(3, &[("Math", "A")]),
            student(4, &[("Art", "X")]),
            student(5, &[("Math", "B"), ("Art", "Y")]),
        ];
        let p = Problem::for_subjects(
            &roster,
            &["Math".into(), "Art".into()],
            &MinimumConfig::global(1),
            1,
        );
        let mut board = TeamBoard::new(&p, 2);
        for s in [0, 3, 4] {
            board.assign(s, 0);
        }
        for s in [1, 2, 5] {
            board.assign(s, 1);
        }
        assert!(board.is_group_consistent());

        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            optimize(&mut board, params(), &mut rng);
            assert!(board.is_group_consistent());
        }
    }

    #[test]
    fn test_single_team_skips_search() {
        let roster = vec![student(0, &[("Math", "A")])];
        let p = Problem::for_subjects(&roster, &["Math".into()], &MinimumConfig::global(1), 1);
        let mut board = TeamBoard::new(&p, 1);
        board.assign(0, 0);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(optimize(&mut board, params(), &mut rng), 0);
    }
}
