//! Subject-mode problem description shared by all allocation phases.
//!
//! Every run is reduced to subjects: in role mode the role transform hands
//! over virtual subjects. Criteria are addressed by index; minimums and
//! upper limits are resolved once, up front.

use std::collections::HashMap;
use std::sync::Arc;

use crate::criteria::{upper_limit, MinimumConfig};
use crate::models::Student;

/// A resolved subject criterion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CriterionSpec {
    /// Subject name as it appears in enrollments.
    pub id: String,
    /// Name used in warning messages.
    pub label: String,
    /// Configured minimum (>= 1).
    pub min: usize,
    /// Soft upper limit.
    pub upper: usize,
}

impl CriterionSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, min: usize, offset: usize) -> Self {
        let min = min.max(1);
        Self {
            id: id.into(),
            label: label.into(),
            min,
            upper: upper_limit(min, offset),
        }
    }
}

/// Students and criteria for one run.
#[derive(Debug)]
pub(crate) struct Problem<'a> {
    students: &'a [Arc<Student>],
    criteria: Vec<CriterionSpec>,
    index: HashMap<String, usize>,
    /// Criteria each student qualifies for.
    qualifying: Vec<Vec<usize>>,
}

impl<'a> Problem<'a> {
    pub fn new(students: &'a [Arc<Student>], criteria: Vec<CriterionSpec>) -> Self {
        let index: HashMap<String, usize> = criteria
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();
        let qualifying = students
            .iter()
            .map(|s| {
                let mut found: Vec<usize> = s
                    .enrollments
                    .iter()
                    .filter_map(|sg| index.get(&sg.subject).copied())
                    .collect();
                found.sort_unstable();
                found.dedup();
                found
            })
            .collect();
        Self {
            students,
            criteria,
            index,
            qualifying,
        }
    }

    /// Builds a problem from plain subject names.
    pub fn for_subjects(
        students: &'a [Arc<Student>],
        subjects: &[String],
        minimums: &MinimumConfig,
        upper_limit_offset: usize,
    ) -> Self {
        let criteria = subjects
            .iter()
            .map(|s| {
                CriterionSpec::new(
                    s.clone(),
                    s.clone(),
                    minimums.configured_min(s),
                    upper_limit_offset,
                )
            })
            .collect();
        Self::new(students, criteria)
    }

    pub fn students(&self) -> &'a [Arc<Student>] {
        self.students
    }

    pub fn student(&self, s: usize) -> &'a Student {
        let students: &'a [Arc<Student>] = self.students;
        &students[s]
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn criteria(&self) -> &[CriterionSpec] {
        &self.criteria
    }

    pub fn criterion(&self, c: usize) -> &CriterionSpec {
        &self.criteria[c]
    }

    pub fn criterion_count(&self) -> usize {
        self.criteria.len()
    }

    /// Whether `subject` is one of the selected criteria.
    pub fn is_criterion(&self, subject: &str) -> bool {
        self.index.contains_key(subject)
    }

    /// Label for a subject (criterion label, else the subject itself).
    pub fn label_of<'s>(&'s self, subject: &'s str) -> &'s str {
        self.index
            .get(subject)
            .map(|&c| self.criteria[c].label.as_str())
            .unwrap_or(subject)
    }

    /// Criteria student `s` qualifies for, ascending.
    pub fn qualifying(&self, s: usize) -> &[usize] {
        &self.qualifying[s]
    }

    pub fn qualifies(&self, s: usize, c: usize) -> bool {
        self.qualifying[s].binary_search(&c).is_ok()
    }

    /// Distinct qualifying students per criterion.
    pub fn students_per_criterion(&self) -> Vec<usize> {
        let mut counts = vec![0; self.criteria.len()];
        for q in &self.qualifying {
            for &c in q {
                counts[c] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_indexes() {
        let students = vec![
            Arc::new(
                Student::new(1)
                    .with_enrollment("Art", "A")
                    .with_enrollment("Math", "A"),
            ),
            Arc::new(Student::new(2).with_enrollment("History", "C")),
        ];
        let subjects = vec!["Math".to_string(), "Art".to_string()];
        let p = Problem::for_subjects(&students, &subjects, &MinimumConfig::global(2), 1);

        assert_eq!(p.criterion_count(), 2);
        assert_eq!(p.criterion(0).min, 2);
        assert_eq!(p.criterion(0).upper, 3);
        assert_eq!(p.qualifying(0), &[0, 1]);
        assert!(p.qualifying(1).is_empty());
        assert!(p.qualifies(0, 1));
        assert!(!p.qualifies(1, 0));
        assert!(p.is_criterion("Art"));
        assert!(!p.is_criterion("History"));
        assert_eq!(p.label_of("History"), "History");
        assert_eq!(p.students_per_criterion(), vec![1, 1]);
    }

    #[test]
    fn test_criterion_spec_clamps_minimum() {
        let spec = CriterionSpec::new("Math", "Mathematics", 0, 1);
        assert_eq!(spec.min, 1);
        assert_eq!(spec.upper, 2);
    }
}
