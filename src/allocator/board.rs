//! Team board: team membership plus the commitment store.
//!
//! `assign` and `remove` are the only operations that change membership or
//! commitments. Every phase goes through them, so the group-consistency
//! bookkeeping cannot drift from the actual members.

use std::sync::Arc;

use super::commitment::CommitmentStore;
use super::problem::Problem;
use crate::models::Team;

/// Working state of one allocation run.
///
/// Students and teams are addressed by index: student `s` is
/// `problem.students()[s]`, team `t` gets id `t + 1`.
#[derive(Debug)]
pub(crate) struct TeamBoard<'p> {
    problem: &'p Problem<'p>,
    members: Vec<Vec<usize>>,
    placement: Vec<Option<usize>>,
    commitments: CommitmentStore,
}

impl<'p> TeamBoard<'p> {
    pub fn new(problem: &'p Problem<'p>, team_count: usize) -> Self {
        Self {
            problem,
            members: vec![Vec::new(); team_count],
            placement: vec![None; problem.student_count()],
            commitments: CommitmentStore::new(team_count),
        }
    }

    pub fn problem(&self) -> &'p Problem<'p> {
        self.problem
    }

    pub fn team_count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self, team: usize) -> &[usize] {
        &self.members[team]
    }

    pub fn size(&self, team: usize) -> usize {
        self.members[team].len()
    }

    pub fn team_of(&self, student: usize) -> Option<usize> {
        self.placement[student]
    }

    pub fn is_assigned(&self, student: usize) -> bool {
        self.team_of(student).is_some()
    }

    /// Unassigned students in roster order.
    pub fn unassigned(&self) -> Vec<usize> {
        (0..self.placement.len())
            .filter(|&s| self.placement[s].is_none())
            .collect()
    }

    pub fn assigned_count(&self) -> usize {
        self.placement.iter().filter(|p| p.is_some()).count()
    }

    /// Members of `team` qualifying for criterion `c`.
    pub fn count(&self, team: usize, c: usize) -> usize {
        self.members[team]
            .iter()
            .filter(|&&m| self.problem.qualifies(m, c))
            .count()
    }

    pub fn commitment(&self, team: usize, subject: &str) -> Option<&str> {
        self.commitments.get(team, subject)
    }

    /// Group held by `student` for `subject`.
    pub fn group_of(&self, student: usize, subject: &str) -> Option<&'p str> {
        self.problem.student(student).group_for(subject)
    }

    /// Whether a member of `team` other than `except` holds `group` of `subject`.
    fn held_by_others(&self, team: usize, subject: &str, group: &str, except: usize) -> bool {
        self.members[team]
            .iter()
            .any(|&m| m != except && self.group_of(m, subject) == Some(group))
    }

    /// Adds `student` to `team`, committing groups for criteria not yet locked.
    pub fn assign(&mut self, student: usize, team: usize) {
        debug_assert!(self.placement[student].is_none());
        self.members[team].push(student);
        self.placement[student] = Some(team);

        let problem = self.problem;
        for sg in &problem.student(student).enrollments {
            if !problem.is_criterion(&sg.subject)
                || self.commitments.get(team, &sg.subject).is_some()
            {
                continue;
            }
            let contested = self.members[team].iter().any(|&m| {
                m != student
                    && self
                        .group_of(m, &sg.subject)
                        .is_some_and(|g| g != sg.group)
            });
            if !contested {
                self.commitments.set(team, &sg.subject, &sg.group);
            }
        }
    }

    /// Removes `student` from `team`, releasing or re-deriving commitments.
    pub fn remove(&mut self, student: usize, team: usize) {
        let Some(pos) = self.members[team].iter().position(|&m| m == student) else {
            return;
        };
        self.members[team].remove(pos);
        self.placement[student] = None;

        let problem = self.problem;
        for sg in &problem.student(student).enrollments {
            if !problem.is_criterion(&sg.subject)
                || self.commitments.get(team, &sg.subject) != Some(sg.group.as_str())
                || self.held_by_others(team, &sg.subject, &sg.group, student)
            {
                continue;
            }
            self.commitments.clear(team, &sg.subject);

            let mut remaining: Vec<&str> = Vec::new();
            for &m in &self.members[team] {
                if let Some(g) = self.group_of(m, &sg.subject) {
                    if !remaining.contains(&g) {
                        remaining.push(g);
                    }
                }
            }
            if let [only] = remaining.as_slice() {
                self.commitments.set(team, &sg.subject, only);
            }
        }
    }

    /// Moves `student` from `from` to `to`.
    pub fn relocate(&mut self, student: usize, from: usize, to: usize) {
        self.remove(student, from);
        self.assign(student, to);
    }

    /// Number of `(team, criterion)` pairs at or above the minimum.
    pub fn satisfied_pairs(&self) -> usize {
        (0..self.team_count())
            .map(|t| {
                (0..self.problem.criterion_count())
                    .filter(|&c| self.count(t, c) >= self.problem.criterion(c).min)
                    .count()
            })
            .sum()
    }

    /// Whether every team holds at most one group per subject.
    pub fn is_group_consistent(&self) -> bool {
        (0..self.team_count()).all(|t| {
            self.members[t].iter().all(|&m| {
                self.problem.student(m).enrollments.iter().all(|sg| {
                    let own = self.group_of(m, &sg.subject);
                    self.members[t].iter().all(|&o| {
                        self.group_of(o, &sg.subject)
                            .map_or(true, |g| Some(g) == own)
                    })
                })
            })
        })
    }

    /// Materializes teams, sharing the roster's students.
    pub fn to_teams(&self) -> Vec<Team> {
        let students = self.problem.students();
        self.members
            .iter()
            .enumerate()
            .map(|(t, ms)| Team {
                id: t as u32 + 1,
                students: ms.iter().map(|&m| Arc::clone(&students[m])).collect(),
            })
            .collect()
    }

    #[cfg(test)]
    pub fn commitments_of(&self, team: usize) -> &std::collections::HashMap<String, String> {
        self.commitments.of_team(team)
    }
}
