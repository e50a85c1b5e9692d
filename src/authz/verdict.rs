use std::fmt;

use serde::Serialize;

/// The rule that let a principal through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// Admin override.
    Admin,
    /// Creator of the project (or of the project the resource lives in).
    Owner,
    /// Creator of the task.
    TaskCreator,
    /// Assignee of the task, or of some task in the project.
    Assignee,
    /// Manager who owns or has an assignment in the task's project.
    ManagerParticipant,
    /// Author of the comment.
    Author,
}

impl Grant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grant::Admin => "admin",
            Grant::Owner => "owner",
            Grant::TaskCreator => "task_creator",
            Grant::Assignee => "assignee",
            Grant::ManagerParticipant => "manager_participant",
            Grant::Author => "author",
        }
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why nothing matched. Kept for logs and tooling, never for clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    NoMatchingRule,
    /// A relation the rules depend on was missing or pointed elsewhere.
    IncompleteSnapshot,
}

impl Denial {
    pub fn as_str(&self) -> &'static str {
        match self {
            Denial::NoMatchingRule => "no_matching_rule",
            Denial::IncompleteSnapshot => "incomplete_snapshot",
        }
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single authorization check. There is no third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "lowercase")]
pub enum Verdict {
    Allow(Grant),
    Deny(Denial),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow(_))
    }

    pub fn grant(&self) -> Option<Grant> {
        match self {
            Verdict::Allow(grant) => Some(*grant),
            Verdict::Deny(_) => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Allow(grant) => write!(f, "allow ({grant})"),
            Verdict::Deny(denial) => write!(f, "deny ({denial})"),
        }
    }
}

/// How much of a task a modify grant covers.
///
/// `AssigneeOnly` means the caller has to narrow the update to the fields a
/// non-owning assignee is allowed to touch; that field list is not decided
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifyScope {
    Full,
    AssigneeOnly,
}

impl From<Grant> for ModifyScope {
    fn from(grant: Grant) -> Self {
        match grant {
            Grant::Assignee => ModifyScope::AssigneeOnly,
            _ => ModifyScope::Full,
        }
    }
}
