//! Authorization module - policy rules and guards
//!
//! This module implements the role and ownership policy for projects, tasks
//! and comments:
//! - Admin override on every check
//! - Ownership (`created_by`) and participation (`assigned_to`) grounds
//! - Deny by default, including on incomplete snapshots
//! - Configurable enforcement modes (strict/advisory)

mod assignment;
mod evaluator;
mod guard;
mod policy;
mod verdict;

pub use assignment::{
    count_active, task_stats, AssignmentError, AssignmentRules, TaskStats, DEFAULT_MAX_ACTIVE_TASKS,
};
pub use evaluator::PolicyEvaluator;
pub use guard::{enforce, require_role, Guard, DENIED_MESSAGE};
pub use policy::AuthorizationPolicy;
pub use verdict::{Denial, Grant, ModifyScope, Verdict};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Comment, Project, Task};

/// Operation class being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Read.
    Access,
    /// Write or delete.
    Modify,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Access => "access",
            Action::Modify => "modify",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "access" | "read" => Ok(Action::Access),
            "modify" | "write" => Ok(Action::Modify),
            other => Err(AppError::bad_request(format!("unknown action: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Task,
    Comment,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Project => "project",
            ResourceKind::Task => "task",
            ResourceKind::Comment => "comment",
        })
    }
}

/// A loaded resource the policy can decide on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resource {
    Project(Project),
    Task(Task),
    Comment(Comment),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Project(_) => ResourceKind::Project,
            Resource::Task(_) => ResourceKind::Task,
            Resource::Comment(_) => ResourceKind::Comment,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Resource::Project(p) => p.id,
            Resource::Task(t) => t.id,
            Resource::Comment(c) => c.id,
        }
    }
}

impl From<Project> for Resource {
    fn from(value: Project) -> Self {
        Resource::Project(value)
    }
}

impl From<Task> for Resource {
    fn from(value: Task) -> Self {
        Resource::Task(value)
    }
}

impl From<Comment> for Resource {
    fn from(value: Comment) -> Self {
        Resource::Comment(value)
    }
}

/// Authorization enforcement mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Enforcement {
    /// Enforce 403 on denied requests
    #[default]
    Strict,
    /// Log denials but allow requests (staging roll-outs)
    Advisory,
}

impl Enforcement {
    /// Anything other than an explicit `advisory` resolves to strict.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "advisory" => Enforcement::Advisory,
            _ => Enforcement::Strict,
        }
    }
}
