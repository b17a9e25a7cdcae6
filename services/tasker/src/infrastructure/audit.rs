//! 审计 Sink 实现

use std::sync::Arc;

use async_trait::async_trait;
use tasker_errors::AppResult;
use tasker_ports::{AuditLogEntry, AuditSink};
use tokio::sync::RwLock;
use tracing::warn;

/// 日志审计 Sink
///
/// 以 warn 级别写出结构化审计记录。
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: AuditLogEntry) -> AppResult<()> {
        warn!(
            target: "tasker::audit",
            audit_id = %entry.id,
            action = %entry.action,
            resource_type = %entry.resource_type,
            resource_id = %entry.resource_id,
            reason = entry.reason.as_deref().unwrap_or_default(),
            occurred_at = %entry.timestamp,
            "Critical task change"
        );
        Ok(())
    }
}

/// 内存审计 Sink
#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    entries: Arc<RwLock<Vec<AuditLogEntry>>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取全部审计记录（用于测试）
    pub async fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, entry: AuditLogEntry) -> AppResult<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_sink_appends() {
        let sink = InMemoryAuditSink::new();
        sink.record(AuditLogEntry::new("HighPriorityTaskChanged", "TaskItem", "1"))
            .await
            .unwrap();
        sink.record(AuditLogEntry::new("HighPriorityTaskChanged", "TaskItem", "2"))
            .await
            .unwrap();

        let entries = sink.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].resource_id, "2");
    }

    #[tokio::test]
    async fn test_tracing_sink_never_fails() {
        assert!(
            TracingAuditSink
                .record(AuditLogEntry::new("HighPriorityTaskChanged", "TaskItem", "1"))
                .await
                .is_ok()
        );
    }
}
