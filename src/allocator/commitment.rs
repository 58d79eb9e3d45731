//! Commitment store: the group each team has locked in per criterion.
//!
//! One entry per `(team, criterion)` at most. Only
//! [`TeamBoard`](super::board::TeamBoard) holds a store, and it changes
//! entries only inside `assign`/`remove`.

use std::collections::HashMap;

/// Per-team, per-criterion group locks, indexed by team position.
#[derive(Debug, Clone, Default)]
pub(crate) struct CommitmentStore {
    teams: Vec<HashMap<String, String>>,
}

impl CommitmentStore {
    pub fn new(team_count: usize) -> Self {
        Self {
            teams: vec![HashMap::new(); team_count],
        }
    }

    /// Committed group of `criterion` in `team`.
    pub fn get(&self, team: usize, criterion: &str) -> Option<&str> {
        self.teams[team].get(criterion).map(String::as_str)
    }

    pub fn set(&mut self, team: usize, criterion: &str, group: &str) {
        self.teams[team]
            .insert(criterion.to_string(), group.to_string());
    }

    pub fn clear(&mut self, team: usize, criterion: &str) {
        self.teams[team].remove(criterion);
    }

    /// All commitments of `team`.
    #[cfg(test)]
    pub fn of_team(&self, team: usize) -> &HashMap<String, String> {
        &self.teams[team]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let mut store = CommitmentStore::new(2);
        assert_eq!(store.get(0, "Math"), None);

        store.set(0, "Math", "A");
        assert_eq!(store.get(0, "Math"), Some("A"));
        assert_eq!(store.get(1, "Math"), None);

        store.set(0, "Math", "B");
        assert_eq!(store.get(0, "Math"), Some("B"));
        assert_eq!(store.of_team(0).len(), 1);

        store.clear(0, "Math");
        assert_eq!(store.get(0, "Math"), None);
    }
}
