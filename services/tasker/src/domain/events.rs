//! 领域事件

use chrono::{DateTime, Utc};
use serde::Serialize;
use tasker_common::TaskId;
use tasker_event_core::DomainEvent;

use super::task::{Priority, TaskItem};

/// 高优先级任务变更
///
/// 不持久化，只交给审计与推送。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighPriorityTaskChanged {
    pub task_id: TaskId,
    pub title: String,
    pub priority: Priority,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

impl HighPriorityTaskChanged {
    pub const CREATED: &'static str = "Task created with high priority";
    pub const ELEVATED: &'static str = "Task priority elevated to High";
    pub const UPDATED: &'static str = "High priority task updated";

    pub fn new(task: &TaskItem, reason: impl Into<String>) -> Self {
        Self {
            task_id: task.id,
            title: task.title.clone(),
            priority: task.priority,
            reason: reason.into(),
            occurred_at: Utc::now(),
        }
    }
}

impl DomainEvent for HighPriorityTaskChanged {
    fn event_type(&self) -> &'static str {
        "HighPriorityTaskChanged"
    }

    fn aggregate_type(&self) -> &'static str {
        "TaskItem"
    }

    fn aggregate_id(&self) -> String {
        self.task_id.to_string()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
