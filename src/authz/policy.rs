use uuid::Uuid;

use super::verdict::{Denial, Grant, ModifyScope, Verdict};
use super::{Action, ResourceKind};
use crate::models::{Comment, Project, Task, User};

/// Role and ownership rules for projects, tasks and comments.
///
/// Every check is a pure function of the snapshots passed in. A relation the
/// rules need but the caller did not load (or loaded for the wrong parent)
/// ends in `Denial::IncompleteSnapshot`, never in an allow.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationPolicy;

impl AuthorizationPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn can_access_project(&self, user: &User, project: &Project) -> bool {
        self.explain_access_project(user, project).is_allowed()
    }

    pub fn can_modify_project(&self, user: &User, project: &Project) -> bool {
        self.explain_modify_project(user, project).is_allowed()
    }

    pub fn can_access_task(&self, user: &User, task: &Task) -> bool {
        self.explain_access_task(user, task).is_allowed()
    }

    pub fn can_modify_task(&self, user: &User, task: &Task) -> bool {
        self.explain_modify_task(user, task).is_allowed()
    }

    pub fn can_access_comment(&self, user: &User, comment: &Comment) -> bool {
        self.explain_access_comment(user, comment).is_allowed()
    }

    pub fn can_modify_comment(&self, user: &User, comment: &Comment) -> bool {
        self.explain_modify_comment(user, comment).is_allowed()
    }

    /// Scope of the modify grant on `task`, or `None` when modify is denied.
    pub fn task_modify_scope(&self, user: &User, task: &Task) -> Option<ModifyScope> {
        self.explain_modify_task(user, task).grant().map(ModifyScope::from)
    }

    pub fn explain_access_project(&self, user: &User, project: &Project) -> Verdict {
        let verdict = if user.is_admin() {
            Verdict::Allow(Grant::Admin)
        } else if project.is_owned_by(user.id) {
            Verdict::Allow(Grant::Owner)
        } else {
            match project.has_task_assigned_to(user.id) {
                Some(true) => Verdict::Allow(Grant::Assignee),
                Some(false) => Verdict::Deny(Denial::NoMatchingRule),
                None => Verdict::Deny(Denial::IncompleteSnapshot),
            }
        };
        record(user, ResourceKind::Project, project.id, Action::Access, verdict)
    }

    pub fn explain_modify_project(&self, user: &User, project: &Project) -> Verdict {
        let verdict = if user.is_admin() {
            Verdict::Allow(Grant::Admin)
        } else if project.is_owned_by(user.id) {
            Verdict::Allow(Grant::Owner)
        } else {
            Verdict::Deny(Denial::NoMatchingRule)
        };
        record(user, ResourceKind::Project, project.id, Action::Modify, verdict)
    }

    pub fn explain_access_task(&self, user: &User, task: &Task) -> Verdict {
        let project = task.parent_project();

        let verdict = if user.is_admin() {
            Verdict::Allow(Grant::Admin)
        } else if task.is_created_by(user.id) {
            Verdict::Allow(Grant::TaskCreator)
        } else if task.is_assigned_to(user.id) {
            Verdict::Allow(Grant::Assignee)
        } else if project.is_some_and(|p| p.is_owned_by(user.id)) {
            Verdict::Allow(Grant::Owner)
        } else if user.is_manager() {
            // whoever may modify a task may read it
            manager_verdict(manager_participates(user.id, task, project))
        } else {
            deny_for(project.is_some())
        };
        record(user, ResourceKind::Task, task.id, Action::Access, verdict)
    }

    pub fn explain_modify_task(&self, user: &User, task: &Task) -> Verdict {
        let project = task.parent_project();

        let verdict = if user.is_admin() {
            Verdict::Allow(Grant::Admin)
        } else if task.is_created_by(user.id) {
            Verdict::Allow(Grant::TaskCreator)
        } else if project.is_some_and(|p| p.is_owned_by(user.id)) {
            Verdict::Allow(Grant::Owner)
        } else if user.is_manager() {
            manager_verdict(manager_participates(user.id, task, project))
        } else if task.is_assigned_to(user.id) {
            Verdict::Allow(Grant::Assignee)
        } else {
            deny_for(project.is_some())
        };
        record(user, ResourceKind::Task, task.id, Action::Modify, verdict)
    }

    pub fn explain_access_comment(&self, user: &User, comment: &Comment) -> Verdict {
        let verdict = if user.is_admin() {
            Verdict::Allow(Grant::Admin)
        } else if comment.is_authored_by(user.id) {
            Verdict::Allow(Grant::Author)
        } else {
            match comment.parent_task() {
                None => Verdict::Deny(Denial::IncompleteSnapshot),
                Some(task) => {
                    let project = task.parent_project();
                    if task.is_created_by(user.id) {
                        Verdict::Allow(Grant::TaskCreator)
                    } else if task.is_assigned_to(user.id) {
                        Verdict::Allow(Grant::Assignee)
                    } else if project.is_some_and(|p| p.is_owned_by(user.id)) {
                        Verdict::Allow(Grant::Owner)
                    } else {
                        deny_for(project.is_some())
                    }
                }
            }
        };
        record(user, ResourceKind::Comment, comment.id, Action::Access, verdict)
    }

    pub fn explain_modify_comment(&self, user: &User, comment: &Comment) -> Verdict {
        let verdict = if user.is_admin() {
            Verdict::Allow(Grant::Admin)
        } else if comment.is_authored_by(user.id) {
            Verdict::Allow(Grant::Author)
        } else {
            Verdict::Deny(Denial::NoMatchingRule)
        };
        record(user, ResourceKind::Comment, comment.id, Action::Modify, verdict)
    }
}

/// A manager participates in a task's project when they own it or hold any
/// assignment in it. The task itself counts even if siblings were not loaded.
/// `None` when the answer depends on a relation that was not loaded.
fn manager_participates(user_id: Uuid, task: &Task, project: Option<&Project>) -> Option<bool> {
    if task.is_assigned_to(user_id) {
        return Some(true);
    }
    let project = project?;
    if project.is_owned_by(user_id) {
        return Some(true);
    }
    project.has_task_assigned_to(user_id)
}

fn manager_verdict(participates: Option<bool>) -> Verdict {
    match participates {
        Some(true) => Verdict::Allow(Grant::ManagerParticipant),
        Some(false) => Verdict::Deny(Denial::NoMatchingRule),
        None => Verdict::Deny(Denial::IncompleteSnapshot),
    }
}

fn deny_for(relations_loaded: bool) -> Verdict {
    if relations_loaded {
        Verdict::Deny(Denial::NoMatchingRule)
    } else {
        Verdict::Deny(Denial::IncompleteSnapshot)
    }
}

fn record(user: &User, kind: ResourceKind, resource_id: Uuid, action: Action, verdict: Verdict) -> Verdict {
    match verdict {
        Verdict::Allow(grant) => tracing::debug!(
            user_id = %user.id,
            role = %user.role,
            resource = %kind,
            resource_id = %resource_id,
            action = %action,
            grant = %grant,
            "authorization granted"
        ),
        Verdict::Deny(denial) => tracing::debug!(
            user_id = %user.id,
            role = %user.role,
            resource = %kind,
            resource_id = %resource_id,
            action = %action,
            reason = %denial,
            "authorization denied"
        ),
    }
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectTask, Role};

    fn user(role: Role) -> User {
        User::new(Uuid::new_v4(), role)
    }

    fn project_with(owner: &User, assignees: &[Uuid]) -> Project {
        Project::new(Uuid::new_v4(), owner.id).with_tasks(
            assignees
                .iter()
                .map(|a| ProjectTask { id: Uuid::new_v4(), assigned_to: Some(*a) }),
        )
    }

    fn task_in(project: &Project) -> Task {
        Task::new(Uuid::new_v4(), project.id).with_project(project.clone())
    }

    #[test]
    fn admin_passes_every_check_on_foreign_resources() {
        let policy = AuthorizationPolicy::new();
        let admin = user(Role::Admin);
        let owner = user(Role::User);
        let project = project_with(&owner, &[]);
        let task = task_in(&project);
        let comment = Comment::new(Uuid::new_v4(), task.id, owner.id).with_task(task.clone());

        assert_eq!(policy.explain_access_project(&admin, &project), Verdict::Allow(Grant::Admin));
        assert!(policy.can_modify_project(&admin, &project));
        assert!(policy.can_access_task(&admin, &task));
        assert!(policy.can_modify_task(&admin, &task));
        assert!(policy.can_access_comment(&admin, &comment));
        assert!(policy.can_modify_comment(&admin, &comment));
    }

    #[test]
    fn admin_passes_even_without_relations() {
        let policy = AuthorizationPolicy::new();
        let admin = user(Role::Admin);
        let task = Task::new(Uuid::new_v4(), Uuid::new_v4());
        let comment = Comment::new(Uuid::new_v4(), task.id, Uuid::new_v4());

        assert!(policy.can_modify_task(&admin, &task));
        assert!(policy.can_access_comment(&admin, &comment));
    }

    #[test]
    fn project_assignee_reads_but_cannot_modify() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::User);
        let assignee = user(Role::User);
        let project = project_with(&owner, &[assignee.id]);

        assert_eq!(policy.explain_access_project(&assignee, &project), Verdict::Allow(Grant::Assignee));
        assert_eq!(
            policy.explain_modify_project(&assignee, &project),
            Verdict::Deny(Denial::NoMatchingRule)
        );
    }

    #[test]
    fn unloaded_project_tasks_fail_closed() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::User);
        let stranger = user(Role::User);
        let project = Project::new(Uuid::new_v4(), owner.id);

        assert_eq!(
            policy.explain_access_project(&stranger, &project),
            Verdict::Deny(Denial::IncompleteSnapshot)
        );
        // ownership needs no relation
        assert!(policy.can_access_project(&owner, &project));
    }

    #[test]
    fn task_creator_without_project_loaded() {
        let policy = AuthorizationPolicy::new();
        let creator = user(Role::User);
        let task = Task::new(Uuid::new_v4(), Uuid::new_v4()).created_by(creator.id);

        assert_eq!(policy.explain_access_task(&creator, &task), Verdict::Allow(Grant::TaskCreator));
        assert_eq!(policy.task_modify_scope(&creator, &task), Some(ModifyScope::Full));
    }

    #[test]
    fn project_owner_substitutes_for_missing_task_creator() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::User);
        let project = project_with(&owner, &[]);
        let task = task_in(&project);

        assert_eq!(policy.explain_access_task(&owner, &task), Verdict::Allow(Grant::Owner));
        assert_eq!(policy.explain_modify_task(&owner, &task), Verdict::Allow(Grant::Owner));
    }

    #[test]
    fn plain_assignee_gets_limited_modify() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::Manager);
        let assignee = user(Role::User);
        let project = project_with(&owner, &[assignee.id]);
        let task = task_in(&project).assigned(assignee.id);

        assert!(policy.can_access_task(&assignee, &task));
        assert_eq!(policy.task_modify_scope(&assignee, &task), Some(ModifyScope::AssigneeOnly));
    }

    #[test]
    fn assignee_of_sibling_task_cannot_touch_this_one() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::Manager);
        let other = user(Role::User);
        let project = project_with(&owner, &[other.id]);
        let task = task_in(&project);

        assert_eq!(policy.explain_access_task(&other, &task), Verdict::Deny(Denial::NoMatchingRule));
        assert!(!policy.can_modify_task(&other, &task));
    }

    #[test]
    fn manager_with_assignment_in_project_modifies_any_task() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::User);
        let manager = user(Role::Manager);
        let project = project_with(&owner, &[manager.id]);
        let task = task_in(&project);

        assert_eq!(
            policy.explain_modify_task(&manager, &task),
            Verdict::Allow(Grant::ManagerParticipant)
        );
        assert!(policy.can_access_task(&manager, &task));
    }

    #[test]
    fn manager_outside_project_is_denied() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::User);
        let manager = user(Role::Manager);
        let project = project_with(&owner, &[owner.id]);
        let task = task_in(&project);

        assert!(!policy.can_access_task(&manager, &task));
        assert!(!policy.can_modify_task(&manager, &task));
    }

    #[test]
    fn manager_check_with_unloaded_sibling_tasks_is_incomplete() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::User);
        let manager = user(Role::Manager);
        let project = Project::new(Uuid::new_v4(), owner.id);
        let task = task_in(&project);

        assert_eq!(
            policy.explain_access_task(&manager, &task),
            Verdict::Deny(Denial::IncompleteSnapshot)
        );
        assert_eq!(
            policy.explain_modify_task(&manager, &task),
            Verdict::Deny(Denial::IncompleteSnapshot)
        );
    }

    #[test]
    fn manager_outside_loaded_project_is_a_plain_refusal() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::User);
        let manager = user(Role::Manager);
        let project = project_with(&owner, &[owner.id]);
        let task = task_in(&project);

        assert_eq!(
            policy.explain_modify_task(&manager, &task),
            Verdict::Deny(Denial::NoMatchingRule)
        );
    }

    #[test]
    fn task_creator_reads_comments_on_their_task() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::Manager);
        let creator = user(Role::User);
        let assignee = user(Role::User);
        let author = user(Role::User);
        let project = project_with(&owner, &[assignee.id]);
        let task = task_in(&project).created_by(creator.id).assigned(assignee.id);
        let comment = Comment::new(Uuid::new_v4(), task.id, author.id).with_task(task);

        assert_eq!(
            policy.explain_access_comment(&creator, &comment),
            Verdict::Allow(Grant::TaskCreator)
        );
        assert!(!policy.can_modify_comment(&creator, &comment));
    }

    #[test]
    fn manager_assigned_to_task_participates_without_project() {
        let policy = AuthorizationPolicy::new();
        let manager = user(Role::Manager);
        let task = Task::new(Uuid::new_v4(), Uuid::new_v4()).assigned(manager.id);

        assert_eq!(
            policy.explain_modify_task(&manager, &task),
            Verdict::Allow(Grant::ManagerParticipant)
        );
    }

    #[test]
    fn mismatched_project_relation_is_ignored() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::User);
        let wrong_project = project_with(&owner, &[]);
        let task = Task::new(Uuid::new_v4(), Uuid::new_v4()).with_project(wrong_project);

        assert_eq!(
            policy.explain_access_task(&owner, &task),
            Verdict::Deny(Denial::IncompleteSnapshot)
        );
        assert!(!policy.can_modify_task(&owner, &task));
    }

    #[test]
    fn comment_reader_via_assignment_cannot_edit() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::Manager);
        let author = user(Role::User);
        let assignee = user(Role::User);
        let project = project_with(&owner, &[assignee.id]);
        let task = task_in(&project).assigned(assignee.id);
        let comment = Comment::new(Uuid::new_v4(), task.id, author.id).with_task(task);

        assert_eq!(policy.explain_access_comment(&assignee, &comment), Verdict::Allow(Grant::Assignee));
        assert!(!policy.can_modify_comment(&assignee, &comment));
        assert_eq!(policy.explain_modify_comment(&author, &comment), Verdict::Allow(Grant::Author));
    }

    #[test]
    fn comment_without_task_fails_closed_for_non_authors() {
        let policy = AuthorizationPolicy::new();
        let author = user(Role::User);
        let reader = user(Role::Manager);
        let comment = Comment::new(Uuid::new_v4(), Uuid::new_v4(), author.id);

        assert_eq!(
            policy.explain_access_comment(&reader, &comment),
            Verdict::Deny(Denial::IncompleteSnapshot)
        );
        assert!(policy.can_access_comment(&author, &comment));
    }

    #[test]
    fn project_owner_reads_comments_on_their_tasks() {
        let policy = AuthorizationPolicy::new();
        let owner = user(Role::User);
        let author = user(Role::User);
        let project = project_with(&owner, &[]);
        let task = task_in(&project);
        let comment = Comment::new(Uuid::new_v4(), task.id, author.id).with_task(task);

        assert_eq!(policy.explain_access_comment(&owner, &comment), Verdict::Allow(Grant::Owner));
        assert!(!policy.can_modify_comment(&owner, &comment));
    }
}
