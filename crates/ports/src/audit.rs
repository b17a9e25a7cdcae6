//! 审计 Sink trait 定义
//!
//! 审计为追加写入，写入失败即视为操作失败。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasker_errors::AppResult;
use uuid::Uuid;

/// 审计日志条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// 唯一标识
    pub id: Uuid,
    /// 事件发生时间
    pub timestamp: DateTime<Utc>,
    /// 操作类型（事件名）
    pub action: String,
    /// 资源类型
    pub resource_type: String,
    /// 资源 ID
    pub resource_id: String,
    /// 原因说明
    pub reason: Option<String>,
    /// 负载（JSON）
    pub payload: Option<serde_json::Value>,
}

impl AuditLogEntry {
    pub fn new(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            reason: None,
            payload: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// 审计 Sink trait
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// 记录单条审计日志
    async fn record(&self, entry: AuditLogEntry) -> AppResult<()>;
}
