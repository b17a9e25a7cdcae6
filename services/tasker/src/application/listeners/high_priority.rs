//! 高优先级任务事件处理
//!
//! 先写审计，再推送；任一步失败都会使整个操作失败，审计失败时不推送。

use std::sync::Arc;

use async_trait::async_trait;
use tasker_errors::AppResult;
use tasker_event_core::{DomainEvent, EventHandler, EventRelay};
use tasker_ports::{AuditLogEntry, AuditSink, PushChannel};

use super::notifications::{TaskNotification, notify};
use crate::domain::HighPriorityTaskChanged;

/// 写入审计日志
pub struct AuditHighPriorityHandler {
    audit: Arc<dyn AuditSink>,
}

impl AuditHighPriorityHandler {
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self { audit }
    }
}

#[async_trait]
impl EventHandler<HighPriorityTaskChanged> for AuditHighPriorityHandler {
    async fn handle(&self, event: &HighPriorityTaskChanged) -> AppResult<()> {
        let payload = serde_json::to_value(event)
            .map_err(|e| tasker_errors::AppError::internal(e.to_string()))?;
        let entry = AuditLogEntry::new(
            event.event_type(),
            event.aggregate_type(),
            event.aggregate_id(),
        )
        .with_timestamp(event.occurred_at)
        .with_reason(event.reason.clone())
        .with_payload(payload);

        self.audit.record(entry).await
    }
}

/// 推送给已连接的客户端
pub struct NotifyHighPriorityHandler {
    push: Arc<dyn PushChannel>,
}

impl NotifyHighPriorityHandler {
    pub fn new(push: Arc<dyn PushChannel>) -> Self {
        Self { push }
    }
}

#[async_trait]
impl EventHandler<HighPriorityTaskChanged> for NotifyHighPriorityHandler {
    async fn handle(&self, event: &HighPriorityTaskChanged) -> AppResult<()> {
        notify(
            self.push.as_ref(),
            TaskNotification::HighPriorityChanged {
                task_id: event.task_id,
                title: &event.title,
                reason: &event.reason,
            },
        )
        .await
    }
}

/// 组装审计在前、推送在后的事件中继
pub fn high_priority_relay(
    audit: Arc<dyn AuditSink>,
    push: Arc<dyn PushChannel>,
) -> EventRelay<HighPriorityTaskChanged> {
    EventRelay::new()
        .then(Arc::new(AuditHighPriorityHandler::new(audit)))
        .then(Arc::new(NotifyHighPriorityHandler::new(push)))
}
