use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Task, TaskStatus, User};

pub const DEFAULT_MAX_ACTIVE_TASKS: usize = 10;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("admin users cannot be assigned to tasks")]
    AdminNotAssignable,
    #[error("user already has too many active tasks (limit {limit})")]
    TooManyActiveTasks { limit: usize },
}

impl From<AssignmentError> for AppError {
    fn from(value: AssignmentError) -> Self {
        AppError::bad_request(value.to_string())
    }
}

/// Who may become the assignee of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentRules {
    pub max_active_tasks: usize,
}

impl Default for AssignmentRules {
    fn default() -> Self {
        Self {
            max_active_tasks: DEFAULT_MAX_ACTIVE_TASKS,
        }
    }
}

impl AssignmentRules {
    pub fn new(max_active_tasks: usize) -> Self {
        Self { max_active_tasks }
    }

    /// `active_tasks` is the number of pending or in-progress tasks already
    /// assigned to `assignee`.
    pub fn check(&self, assignee: &User, active_tasks: usize) -> Result<(), AssignmentError> {
        if assignee.is_admin() {
            return Err(AssignmentError::AdminNotAssignable);
        }

        if active_tasks >= self.max_active_tasks {
            tracing::debug!(
                user_id = %assignee.id,
                active_tasks,
                limit = self.max_active_tasks,
                "assignment rejected: workload limit"
            );
            return Err(AssignmentError::TooManyActiveTasks {
                limit: self.max_active_tasks,
            });
        }

        Ok(())
    }
}

/// Active tasks in `tasks` assigned to `user_id`.
pub fn count_active<'a>(tasks: impl IntoIterator<Item = &'a Task>, user_id: Uuid) -> usize {
    tasks
        .into_iter()
        .filter(|t| t.is_assigned_to(user_id) && t.status.is_active())
        .count()
}

/// Per-status workload of one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total_tasks: usize,
    pub pending_tasks: usize,
    pub in_progress_tasks: usize,
    pub completed_tasks: usize,
}

impl TaskStats {
    pub fn active_tasks(&self) -> usize {
        self.pending_tasks + self.in_progress_tasks
    }
}

/// Tally of the tasks in `tasks` assigned to `user_id`, by status.
pub fn task_stats<'a>(tasks: impl IntoIterator<Item = &'a Task>, user_id: Uuid) -> TaskStats {
    tasks
        .into_iter()
        .filter(|t| t.is_assigned_to(user_id))
        .fold(TaskStats::default(), |mut stats, task| {
            stats.total_tasks += 1;
            match task.status {
                TaskStatus::Pending => stats.pending_tasks += 1,
                TaskStatus::InProgress => stats.in_progress_tasks += 1,
                TaskStatus::Done => stats.completed_tasks += 1,
            }
            stats
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn admins_are_never_assignable() {
        let admin = User::new(Uuid::new_v4(), Role::Admin);
        assert_eq!(
            AssignmentRules::default().check(&admin, 0),
            Err(AssignmentError::AdminNotAssignable)
        );
    }

    #[test]
    fn workload_limit_is_exclusive() {
        let rules = AssignmentRules::default();
        let user = User::new(Uuid::new_v4(), Role::User);

        assert!(rules.check(&user, 9).is_ok());
        assert_eq!(
            rules.check(&user, 10),
            Err(AssignmentError::TooManyActiveTasks { limit: 10 })
        );
    }

    #[test]
    fn managers_are_assignable() {
        let manager = User::new(Uuid::new_v4(), Role::Manager);
        assert!(AssignmentRules::new(1).check(&manager, 0).is_ok());
    }

    #[test]
    fn counts_only_open_tasks_of_the_user() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let project = Uuid::new_v4();
        let tasks = vec![
            Task::new(Uuid::new_v4(), project).assigned(user),
            Task::new(Uuid::new_v4(), project).assigned(user).with_status(TaskStatus::InProgress),
            Task::new(Uuid::new_v4(), project).assigned(user).with_status(TaskStatus::Done),
            Task::new(Uuid::new_v4(), project).assigned(other),
            Task::new(Uuid::new_v4(), project),
        ];

        assert_eq!(count_active(&tasks, user), 2);
    }

    #[test]
    fn stats_split_by_status() {
        let user = Uuid::new_v4();
        let project = Uuid::new_v4();
        let tasks = vec![
            Task::new(Uuid::new_v4(), project).assigned(user),
            Task::new(Uuid::new_v4(), project).assigned(user).with_status(TaskStatus::InProgress),
            Task::new(Uuid::new_v4(), project).assigned(user).with_status(TaskStatus::Done),
            Task::new(Uuid::new_v4(), project).assigned(user).with_status(TaskStatus::Done),
            Task::new(Uuid::new_v4(), project).with_status(TaskStatus::Pending),
        ];

        let stats = task_stats(&tasks, user);
        assert_eq!(
            stats,
            TaskStats { total_tasks: 4, pending_tasks: 1, in_progress_tasks: 1, completed_tasks: 2 }
        );
        assert_eq!(stats.active_tasks(), count_active(&tasks, user));
        assert_eq!(task_stats(&tasks, Uuid::new_v4()), TaskStats::default());
    }

    #[test]
    fn converts_to_bad_request() {
        let err: AppError = AssignmentError::AdminNotAssignable.into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
