//! 推送通道实现
//!
//! 基于 `tokio::sync::broadcast`，每个已连接客户端持有一个订阅者。

use async_trait::async_trait;
use tasker_errors::AppResult;
use tasker_ports::PushChannel;
use tokio::sync::broadcast;
use tracing::debug;

/// 推送消息
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub event_name: String,
    pub payload: serde_json::Value,
}

/// 广播推送通道
#[derive(Clone)]
pub struct BroadcastPushChannel {
    sender: broadcast::Sender<PushMessage>,
}

impl BroadcastPushChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 新客户端连接
    pub fn subscribe(&self) -> broadcast::Receiver<PushMessage> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastPushChannel {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl PushChannel for BroadcastPushChannel {
    async fn broadcast(&self, event_name: &str, payload: serde_json::Value) -> AppResult<()> {
        let message = PushMessage {
            event_name: event_name.to_string(),
            payload,
        };
        // 无订阅者时 send 返回错误，这不算失败
        match self.sender.send(message) {
            Ok(receivers) => debug!(event = event_name, receivers, "Push message sent"),
            Err(_) => debug!(event = event_name, "No connected clients"),
        }
        Ok(())
    }
}
