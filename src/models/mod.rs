pub mod comment;
pub mod project;
pub mod task;
pub mod user;

pub use comment::Comment;
pub use project::{Project, ProjectTask};
pub use task::{Task, TaskStatus};
pub use user::{Role, User, UserRecord};
