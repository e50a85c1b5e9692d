pub mod authz;
pub mod config;
pub mod errors;
pub mod models;
pub mod snapshot;

// Re-export commonly used items for tests
pub use authz::{Action, AuthorizationPolicy, PolicyEvaluator, Resource, Verdict};
pub use config::PolicyConfig;
