//! Role mode: roles rewritten as virtual subjects.
//!
//! The allocator only knows subjects. In role mode every role becomes one
//! virtual subject named by the role id, and every `(subject, group)` pair
//! that fulfils it becomes the virtual group `"{subject} {group}"`:
//!
//! ```text
//! roles:   analyst = {Math, Statistics}   designer = {Art}
//! student: Math/A, Art/X, History/H
//! virtual: analyst/"Math A", designer/"Art X"
//! ```
//!
//! A student holding two subjects of one role gets two virtual groups for
//! it; the first one is the group the allocator checks. Minimums are
//! resolved per role before the transform and handed to the engine in
//! individual mode. Once the run finishes, [`RoleTransform::restore`] maps
//! teams back onto the caller's students and rewrites warnings to name
//! roles.

use std::collections::HashMap;
use std::sync::Arc;

use crate::allocator::problem::{CriterionSpec, Problem};
use crate::criteria::MinimumConfig;
use crate::error::AllocationError;
use crate::models::{
    Allocation, AssignmentWarning, Criterion, Role, Student, StudentId, SubjectGroup, Team,
};

/// Two-way mapping between a role roster and its virtual-subject form.
#[derive(Debug, Clone)]
pub struct RoleTransform {
    roles: Vec<Role>,
    students: Vec<Arc<Student>>,
    minimums: MinimumConfig,
}

impl RoleTransform {
    /// Builds virtual students and resolved minimums for `roles`.
    ///
    /// Every student is kept, including those that fulfil no role; they
    /// still need a team.
    pub fn new(students: &[Arc<Student>], roles: &[Role], minimums: &MinimumConfig) -> Self {
        let students = students
            .iter()
            .map(|s| Arc::new(virtual_student(s, roles)))
            .collect();

        let resolved = roles.iter().fold(MinimumConfig::individual(), |config, role| {
            let min = minimums.minimum_for(&Criterion::Role(role.clone()));
            config.with_minimum(role.id.clone(), min)
        });

        Self {
            roles: roles.to_vec(),
            students,
            minimums: resolved,
        }
    }

    /// Students with role enrollments only.
    pub fn virtual_students(&self) -> &[Arc<Student>] {
        &self.students
    }

    /// Virtual subject names, in role order.
    ///
    /// With [`virtual_students`](Self::virtual_students) and
    /// [`minimums`](Self::minimums) this forms a plain subject-mode request,
    /// for callers that drive the allocator on the transformed roster
    /// themselves and map the result back with [`restore`](Self::restore).
    ///
    /// ```
    /// use std::sync::Arc;
    /// use u_team::allocator::{AllocationRequest, TeamAllocator};
    /// use u_team::config::AllocationConfig;
    /// use u_team::criteria::MinimumConfig;
    /// use u_team::models::{CriteriaSelection, Role, Student};
    /// use u_team::roles::RoleTransform;
    ///
    /// let students: Vec<_> = (1..=4)
    ///     .map(|i| Arc::new(Student::new(i).with_enrollment("Math", "A")))
    ///     .collect();
    /// let roles = vec![Role::new("quant").with_subject("Math")];
    /// let transform = RoleTransform::new(&students, &roles, &MinimumConfig::global(2));
    ///
    /// let request = AllocationRequest::new(
    ///     transform.virtual_students().to_vec(),
    ///     CriteriaSelection::Subjects(transform.virtual_subjects()),
    ///     2,
    /// )
    /// .with_minimums(transform.minimums().clone());
    ///
    /// let allocator = TeamAllocator::new(AllocationConfig::default().with_seed(3));
    /// let allocation = allocator.allocate(&request).unwrap();
    /// let restored = transform.restore(allocation, &students).unwrap();
    /// assert_eq!(restored.teams.len(), 2);
    /// assert!(restored.teams.iter().all(|t| t.size() == 2));
    /// ```
    pub fn virtual_subjects(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.id.clone()).collect()
    }

    /// Per-role minimums in individual mode, keyed by role id.
    pub fn minimums(&self) -> &MinimumConfig {
        &self.minimums
    }

    pub(crate) fn problem(&self, upper_limit_offset: usize) -> Problem<'_> {
        let criteria = self
            .roles
            .iter()
            .map(|role| {
                CriterionSpec::new(
                    role.id.clone(),
                    role.label(),
                    self.minimums.configured_min(&role.id),
                    upper_limit_offset,
                )
            })
            .collect();
        Problem::new(&self.students, criteria)
    }

    /// Maps a virtual-subject allocation back onto `originals`.
    ///
    /// # Errors
    /// [`AllocationError::UnknownStudent`] if a team member has no record in
    /// `originals`.
    pub fn restore(
        &self,
        allocation: Allocation,
        originals: &[Arc<Student>],
    ) -> Result<Allocation, AllocationError> {
        let by_id: HashMap<&StudentId, &Arc<Student>> =
            originals.iter().map(|s| (&s.id, s)).collect();

        let teams = allocation
            .teams
            .into_iter()
            .map(|team| {
                let students = team
                    .students
                    .iter()
                    .map(|v| {
                        by_id
                            .get(&v.id)
                            .map(|s| Arc::clone(s))
                            .ok_or_else(|| AllocationError::UnknownStudent(v.id.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Team { id: team.id, students })
            })
            .collect::<Result<Vec<_>, AllocationError>>()?;

        let warnings = allocation
            .warnings
            .into_iter()
            .map(|w| self.restore_warning(w))
            .collect();

        Ok(Allocation { teams, warnings })
    }

    /// Rewrites a warning on a virtual subject to name the role instead.
    pub(crate) fn restore_warning(&self, mut warning: AssignmentWarning) -> AssignmentWarning {
        let is_role = warning
            .subject
            .as_deref()
            .is_some_and(|s| self.roles.iter().any(|r| r.id == s));
        if is_role {
            warning.role = warning.subject.take();
        }
        warning
    }
}

fn virtual_student(student: &Student, roles: &[Role]) -> Student {
    let enrollments = roles
        .iter()
        .flat_map(|role| {
            student
                .enrollments
                .iter()
                .filter(|sg| role.subjects.contains(&sg.subject))
                .map(|sg| {
                    SubjectGroup::new(role.id.clone(), format!("{} {}", sg.subject, sg.group))
                })
        })
        .collect();

    Student {
        id: student.id.clone(),
        name: student.name.clone(),
        email: student.email.clone(),
        enrollments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> Vec<Role> {
        vec![
            Role::new("analyst")
                .with_name("Analyst")
                .with_subject("Math")
                .with_subject("Statistics")
                .with_minimum(2),
            Role::new("designer").with_subject("Art"),
        ]
    }

    fn roster() -> Vec<Arc<Student>> {
        vec![
            Arc::new(
                Student::new(1)
                    .with_name("Ada")
                    .with_enrollment("Math", "A")
                    .with_enrollment("Art", "X")
                    .with_enrollment("History", "H"),
            ),
            Arc::new(
                Student::new(2)
                    .with_enrollment("Statistics", "S1")
                    .with_enrollment("Math", "B"),
            ),
            Arc::new(Student::new(3).with_enrollment("History", "H")),
        ]
    }

    #[test]
    fn test_virtual_enrollments() {
        let transform = RoleTransform::new(&roster(), &roles(), &MinimumConfig::default());
        let virtuals = transform.virtual_students();

        assert_eq!(virtuals.len(), 3);
        assert_eq!(virtuals[0].name, "Ada");
        assert_eq!(
            virtuals[0].enrollments,
            vec![
                SubjectGroup::new("analyst", "Math A"),
                SubjectGroup::new("designer", "Art X"),
            ]
        );
        // One virtual group per matching enrollment; the first is checked.
        assert_eq!(virtuals[1].enrollments.len(), 2);
        assert_eq!(virtuals[1].group_for("analyst"), Some("Statistics S1"));
        assert!(virtuals[2].enrollments.is_empty());
        assert_eq!(transform.virtual_subjects(), vec!["analyst", "designer"]);
    }

    #[test]
    fn test_minimums_resolved_per_role() {
        let transform = RoleTransform::new(&roster(), &roles(), &MinimumConfig::global(3));
        assert_eq!(transform.minimums().configured_min("analyst"), 3);
        assert_eq!(transform.minimums().configured_min("designer"), 3);

        let transform = RoleTransform::new(&roster(), &roles(), &MinimumConfig::individual());
        assert_eq!(transform.minimums().configured_min("analyst"), 2);
        assert_eq!(transform.minimums().configured_min("designer"), 1);

        let explicit = MinimumConfig::individual().with_minimum("designer", 4);
        let transform = RoleTransform::new(&roster(), &roles(), &explicit);
        assert_eq!(transform.minimums().configured_min("analyst"), 2);
        assert_eq!(transform.minimums().configured_min("designer"), 4);
    }

    #[test]
    fn test_problem_uses_role_labels() {
        let transform = RoleTransform::new(&roster(), &roles(), &MinimumConfig::individual());
        let problem = transform.problem(1);
        assert_eq!(problem.criterion(0).label, "Analyst");
        assert_eq!(problem.criterion(1).label, "designer");
        assert_eq!(problem.criterion(0).upper, 3);
        assert_eq!(problem.qualifying(0), &[0, 1]);
        assert!(problem.qualifying(2).is_empty());
    }

    #[test]
    fn test_restore_maps_back_to_originals() {
        let originals = roster();
        let transform = RoleTransform::new(&originals, &roles(), &MinimumConfig::default());
        let virtuals = transform.virtual_students();

        let allocation = Allocation {
            teams: vec![Team {
                id: 1,
                students: vec![Arc::clone(&virtuals[0]), Arc::clone(&virtuals[2])],
            }],
            warnings: vec![
                AssignmentWarning::critical("Team 1 has no students for 'Analyst'")
                    .with_team(1)
                    .with_subject("analyst"),
                AssignmentWarning::notice("Only 1 of 2 requested teams could be formed"),
            ],
        };

        let restored = transform.restore(allocation, &originals).unwrap();
        let team = &restored.teams[0];
        assert!(Arc::ptr_eq(&team.students[0], &originals[0]));
        assert!(Arc::ptr_eq(&team.students[1], &originals[2]));
        assert_eq!(team.students[0].enrollments.len(), 3);

        assert_eq!(restored.warnings[0].role.as_deref(), Some("analyst"));
        assert_eq!(restored.warnings[0].subject, None);
        assert_eq!(restored.warnings[1].role, None);
    }

    #[test]
    fn test_restore_unknown_student() {
        let originals = roster();
        let transform = RoleTransform::new(&originals, &roles(), &MinimumConfig::default());
        let allocation = Allocation {
            teams: vec![Team {
                id: 1,
                students: vec![Arc::new(Student::new(99))],
            }],
            warnings: Vec::new(),
        };

        let err = transform.restore(allocation, &originals).unwrap_err();
        assert_eq!(err, AllocationError::UnknownStudent(StudentId::Number(99)));
    }
}
