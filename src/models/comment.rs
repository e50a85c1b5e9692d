use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::task::Task;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub task_id: Uuid,
    /// Author.
    pub user_id: Uuid,
    #[serde(default)]
    pub task: Option<Task>,
}

impl Comment {
    pub fn new(id: Uuid, task_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id,
            task_id,
            user_id,
            task: None,
        }
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.task = Some(task);
        self
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// The loaded parent task, provided it is the one `task_id` points at.
    pub fn parent_task(&self) -> Option<&Task> {
        self.task.as_ref().filter(|t| t.id == self.task_id)
    }
}
