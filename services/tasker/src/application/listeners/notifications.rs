//! 任务变更推送
//!
//! 推送在提交之后进行；推送失败会使命令返回错误，但已提交的数据保留。

use serde_json::json;
use tasker_common::TaskId;
use tasker_errors::AppResult;
use tasker_ports::PushChannel;
use tracing::warn;

/// 推送给客户端的任务事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskNotification<'a> {
    Created { task_id: TaskId, title: &'a str },
    Updated { task_id: TaskId, title: &'a str },
    Deleted { task_id: TaskId },
    HighPriorityChanged {
        task_id: TaskId,
        title: &'a str,
        reason: &'a str,
    },
}

impl TaskNotification<'_> {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "TaskCreated",
            Self::Updated { .. } => "TaskUpdated",
            Self::Deleted { .. } => "TaskDeleted",
            Self::HighPriorityChanged { .. } => "HighPriorityTaskChanged",
        }
    }

    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::Created { task_id, title } | Self::Updated { task_id, title } => {
                json!({ "taskId": task_id, "title": title })
            }
            Self::Deleted { task_id } => json!({ "taskId": task_id }),
            Self::HighPriorityChanged {
                task_id,
                title,
                reason,
            } => json!({ "taskId": task_id, "title": title, "reason": reason }),
        }
    }
}

/// 广播任务事件，失败时记录告警并返回错误
pub async fn notify(push: &dyn PushChannel, notification: TaskNotification<'_>) -> AppResult<()> {
    let event_name = notification.event_name();
    push.broadcast(event_name, notification.payload())
        .await
        .inspect_err(|e| warn!(event = event_name, error = %e, "Push notification failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let task_id = TaskId::new();
        let payload = TaskNotification::HighPriorityChanged {
            task_id,
            title: "Ship",
            reason: "Task created with high priority",
        }
        .payload();

        assert_eq!(payload["taskId"], json!(task_id));
        assert_eq!(payload["reason"], "Task created with high priority");
        assert_eq!(
            TaskNotification::Deleted { task_id }.payload(),
            json!({ "taskId": task_id })
        );
    }
}
