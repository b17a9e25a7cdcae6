//! Domain Event 定义

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Domain Event trait
pub trait DomainEvent: Send + Sync + Serialize {
    /// 事件类型名称
    fn event_type(&self) -> &'static str;

    /// 聚合类型
    fn aggregate_type(&self) -> &'static str;

    /// 聚合 ID
    fn aggregate_id(&self) -> String;

    /// 发生时间
    fn occurred_at(&self) -> DateTime<Utc>;
}
