use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimal view of a task row, as loaded alongside its project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTask {
    pub id: Uuid,
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub created_by: Uuid,
    /// `None` when the task relation was not loaded, which is not the same
    /// as a project without tasks.
    #[serde(default)]
    pub tasks: Option<Vec<ProjectTask>>,
}

impl Project {
    pub fn new(id: Uuid, created_by: Uuid) -> Self {
        Self {
            id,
            created_by,
            tasks: None,
        }
    }

    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = ProjectTask>) -> Self {
        self.tasks = Some(tasks.into_iter().collect());
        self
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by == user_id
    }

    /// `Some(true)` if any loaded task is assigned to `user_id`, `None` when
    /// tasks were not loaded.
    pub fn has_task_assigned_to(&self, user_id: Uuid) -> Option<bool> {
        self.tasks
            .as_ref()
            .map(|tasks| tasks.iter().any(|t| t.assigned_to == Some(user_id)))
    }
}
