use super::policy::AuthorizationPolicy;
use super::verdict::Verdict;
use super::{Action, Resource};
use crate::models::User;

/// Seam between request handling and the authorization rules.
///
/// Implementations must be pure: no I/O, no shared mutable state, so a single
/// evaluator can be shared across every request task.
pub trait PolicyEvaluator: Send + Sync {
    fn evaluate(&self, user: &User, resource: &Resource, action: Action) -> Verdict;

    fn can(&self, user: &User, resource: &Resource, action: Action) -> bool {
        self.evaluate(user, resource, action).is_allowed()
    }
}

impl PolicyEvaluator for AuthorizationPolicy {
    fn evaluate(&self, user: &User, resource: &Resource, action: Action) -> Verdict {
        match (resource, action) {
            (Resource::Project(project), Action::Access) => self.explain_access_project(user, project),
            (Resource::Project(project), Action::Modify) => self.explain_modify_project(user, project),
            (Resource::Task(task), Action::Access) => self.explain_access_task(user, task),
            (Resource::Task(task), Action::Modify) => self.explain_modify_task(user, task),
            (Resource::Comment(comment), Action::Access) => self.explain_access_comment(user, comment),
            (Resource::Comment(comment), Action::Modify) => self.explain_modify_comment(user, comment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::verdict::{Denial, Grant};
    use crate::models::{Comment, Project, Role, Task};
    use uuid::Uuid;

    #[test]
    fn dispatches_by_resource_and_action() {
        let evaluator = AuthorizationPolicy::new();
        let owner = User::new(Uuid::new_v4(), Role::User);
        let project = Project::new(Uuid::new_v4(), owner.id).with_tasks(vec![]);
        let task = Task::new(Uuid::new_v4(), project.id).with_project(project.clone());
        let comment = Comment::new(Uuid::new_v4(), task.id, Uuid::new_v4()).with_task(task.clone());

        let project = Resource::Project(project);
        let task = Resource::Task(task);
        let comment = Resource::Comment(comment);

        assert_eq!(evaluator.evaluate(&owner, &project, Action::Modify), Verdict::Allow(Grant::Owner));
        assert_eq!(evaluator.evaluate(&owner, &task, Action::Modify), Verdict::Allow(Grant::Owner));
        assert_eq!(evaluator.evaluate(&owner, &comment, Action::Access), Verdict::Allow(Grant::Owner));
        assert_eq!(
            evaluator.evaluate(&owner, &comment, Action::Modify),
            Verdict::Deny(Denial::NoMatchingRule)
        );
    }

    #[test]
    fn works_behind_a_trait_object() {
        let evaluator: Box<dyn PolicyEvaluator> = Box::new(AuthorizationPolicy::new());
        let stranger = User::new(Uuid::new_v4(), Role::Manager);
        let project = Resource::Project(Project::new(Uuid::new_v4(), Uuid::new_v4()).with_tasks(vec![]));

        assert!(!evaluator.can(&stranger, &project, Action::Access));
    }
}
