//! 领域事件监听器

mod high_priority;
mod notifications;

pub use high_priority::{AuditHighPriorityHandler, NotifyHighPriorityHandler, high_priority_relay};
pub use notifications::{TaskNotification, notify};
