//! Push Channel trait 定义

use async_trait::async_trait;
use tasker_errors::AppResult;

/// 推送通道：向所有已连接客户端广播具名事件
///
/// 无订阅者不视为错误；发送失败返回错误。
#[async_trait]
pub trait PushChannel: Send + Sync {
    async fn broadcast(&self, event_name: &str, payload: serde_json::Value) -> AppResult<()>;
}
