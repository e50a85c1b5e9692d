use crate::authz::{AssignmentRules, Enforcement, DEFAULT_MAX_ACTIVE_TASKS};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyConfig {
    pub enforcement: Enforcement,
    pub max_active_tasks: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            enforcement: Enforcement::Strict,
            max_active_tasks: DEFAULT_MAX_ACTIVE_TASKS,
        }
    }
}

impl PolicyConfig {
    /// Reads `AUTHZ_MODE` and `AUTHZ_MAX_ACTIVE_TASKS`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let enforcement = lookup("AUTHZ_MODE")
            .map(|val| Enforcement::parse(&val))
            .unwrap_or_default();
        let max_active_tasks = lookup("AUTHZ_MAX_ACTIVE_TASKS")
            .map(|val| val.trim().parse::<usize>())
            .unwrap_or(Ok(DEFAULT_MAX_ACTIVE_TASKS))
            .map_err(|_| AppError::configuration("AUTHZ_MAX_ACTIVE_TASKS must be a valid integer"))?;

        Ok(Self {
            enforcement,
            max_active_tasks,
        })
    }

    pub fn assignment_rules(&self) -> AssignmentRules {
        AssignmentRules::new(self.max_active_tasks)
    }
}
