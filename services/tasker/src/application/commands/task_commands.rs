//! 任务命令

use chrono::{DateTime, Utc};
use tasker_common::TaskId;
use tasker_cqrs_core::Command;

use crate::application::dto::TaskDto;
use crate::domain::{Priority, TaskStatus};

/// 创建任务
#[derive(Debug, Clone)]
pub struct CreateTaskItemCommand {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl Command for CreateTaskItemCommand {
    type Result = TaskDto;
}

/// 更新任务
#[derive(Debug, Clone)]
pub struct UpdateTaskItemCommand {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
}

impl Command for UpdateTaskItemCommand {
    type Result = ();
}

/// 删除任务
#[derive(Debug, Clone)]
pub struct DeleteTaskItemCommand {
    pub id: TaskId,
}

impl Command for DeleteTaskItemCommand {
    type Result = ();
}
