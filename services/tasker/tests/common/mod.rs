//! 集成测试公共装配

#![allow(dead_code)]

use std::sync::Arc;

use tasker::infrastructure::audit::InMemoryAuditSink;
use tasker::infrastructure::persistence::InMemoryStore;
use tasker::infrastructure::push::{BroadcastPushChannel, PushMessage};
use tasker::{ServiceDeps, build_dispatcher};
use tasker_auth_core::TokenService;
use tasker_config::JwtConfig;
use tasker_cqrs_core::Dispatcher;
use tasker_ports::{AuditSink, PushChannel};
use tokio::sync::broadcast;

pub const SIGNING_KEY: &str = "integration-test-signing-key-0123456789abcdef";

pub fn token_service() -> Arc<TokenService> {
    Arc::new(TokenService::from_config(&JwtConfig::new(SIGNING_KEY)).unwrap())
}

/// 基于内存存储的完整分发器
pub struct TestApp {
    pub dispatcher: Dispatcher,
    pub store: InMemoryStore,
    pub audit: InMemoryAuditSink,
    pub push: BroadcastPushChannel,
    pub token_service: Arc<TokenService>,
}

impl TestApp {
    pub fn new() -> Self {
        let audit = InMemoryAuditSink::new();
        let push = BroadcastPushChannel::new(64);
        let (dispatcher, store, token_service) =
            Self::assemble(Arc::new(audit.clone()), Arc::new(push.clone()));
        Self {
            dispatcher,
            store,
            audit,
            push,
            token_service,
        }
    }

    /// 使用自定义审计与推送实现组装
    pub fn assemble(
        audit: Arc<dyn AuditSink>,
        push: Arc<dyn PushChannel>,
    ) -> (Dispatcher, InMemoryStore, Arc<TokenService>) {
        let store = InMemoryStore::new();
        let token_service = token_service();
        let dispatcher = build_dispatcher(ServiceDeps {
            uow_factory: Arc::new(store.clone()),
            token_service: token_service.clone(),
            audit,
            push,
        })
        .unwrap();
        (dispatcher, store, token_service)
    }
}

/// 取出订阅者已收到的全部推送
pub fn drain(receiver: &mut broadcast::Receiver<PushMessage>) -> Vec<PushMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = receiver.try_recv() {
        messages.push(message);
    }
    messages
}
