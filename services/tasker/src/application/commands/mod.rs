//! 命令定义

mod auth_commands;
mod task_commands;

pub use auth_commands::*;
pub use task_commands::*;
