use super::evaluator::PolicyEvaluator;
use super::policy::AuthorizationPolicy;
use super::verdict::Verdict;
use super::{Action, Enforcement, Resource};
use crate::config::PolicyConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Role, User};

/// The only message a client sees on denial, whatever rule failed.
pub const DENIED_MESSAGE: &str = "you are not allowed to perform this action";

/// Turn a verdict into a request outcome.
pub fn enforce(verdict: Verdict, enforcement: Enforcement) -> AppResult<()> {
    match (verdict, enforcement) {
        (Verdict::Allow(_), _) => Ok(()),
        (Verdict::Deny(denial), Enforcement::Advisory) => {
            tracing::warn!(reason = %denial, "authorization denied (advisory mode, allowing)");
            Ok(())
        }
        (Verdict::Deny(_), Enforcement::Strict) => Err(AppError::forbidden(DENIED_MESSAGE)),
    }
}

/// Role gate for role-restricted operations. Passing any one of `allowed`
/// is enough; a missing user is unauthenticated rather than forbidden.
pub fn require_role(user: Option<&User>, allowed: &[Role]) -> AppResult<()> {
    let user = user.ok_or_else(|| AppError::unauthorized("authentication required"))?;

    if allowed.contains(&user.role) {
        return Ok(());
    }

    tracing::debug!(user_id = %user.id, role = %user.role, ?allowed, "role gate denied");
    Err(AppError::forbidden(DENIED_MESSAGE))
}

/// Evaluator plus enforcement mode, shared by request handlers.
#[derive(Debug, Clone)]
pub struct Guard<E = AuthorizationPolicy> {
    evaluator: E,
    enforcement: Enforcement,
}

impl Guard<AuthorizationPolicy> {
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(AuthorizationPolicy::new(), config.enforcement)
    }
}

impl<E: PolicyEvaluator> Guard<E> {
    pub fn new(evaluator: E, enforcement: Enforcement) -> Self {
        Self { evaluator, enforcement }
    }

    pub fn enforcement(&self) -> Enforcement {
        self.enforcement
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn authorize(&self, user: &User, resource: &Resource, action: Action) -> AppResult<()> {
        let verdict = self.evaluator.evaluate(user, resource, action);
        if !verdict.is_allowed() {
            tracing::debug!(
                user_id = %user.id,
                resource = %resource.kind(),
                resource_id = %resource.id(),
                action = %action,
                "request rejected by policy"
            );
        }
        enforce(verdict, self.enforcement)
    }
}
