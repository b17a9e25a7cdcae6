//! 领域层

pub mod events;
pub mod refresh_token;
pub mod repositories;
pub mod task;
pub mod unit_of_work;
pub mod user;

pub use events::HighPriorityTaskChanged;
pub use refresh_token::RefreshToken;
pub use task::{Priority, TaskItem, TaskStatus};
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};
pub use user::{HashedPassword, PasswordError, User};
