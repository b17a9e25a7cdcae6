//! 注册表装配测试

mod common;

use std::sync::Arc;

use tasker::application::commands::{
    CreateTaskItemCommand, DeleteTaskItemCommand, LoginCommand, LogoutCommand,
    RefreshTokenCommand, RegisterCommand, UpdateTaskItemCommand,
};
use tasker::application::queries::{
    GetTaskItemByIdQuery, GetTaskItemStatsQuery, GetTaskItemsPagedQuery,
};
use tasker::infrastructure::audit::InMemoryAuditSink;
use tasker::infrastructure::persistence::InMemoryStore;
use tasker::infrastructure::push::BroadcastPushChannel;
use tasker::{ServiceDeps, build_registry};

fn deps() -> ServiceDeps {
    ServiceDeps {
        uow_factory: Arc::new(InMemoryStore::new()),
        token_service: common::token_service(),
        audit: Arc::new(InMemoryAuditSink::new()),
        push: Arc::new(BroadcastPushChannel::default()),
    }
}

#[test]
fn test_registry_covers_every_request() {
    let registry = build_registry(deps()).unwrap();

    assert_eq!(registry.len(), 10);
    assert!(registry.contains::<RegisterCommand>());
    assert!(registry.contains::<LoginCommand>());
    assert!(registry.contains::<RefreshTokenCommand>());
    assert!(registry.contains::<LogoutCommand>());
    assert!(registry.contains::<CreateTaskItemCommand>());
    assert!(registry.contains::<UpdateTaskItemCommand>());
    assert!(registry.contains::<DeleteTaskItemCommand>());
    assert!(registry.contains::<GetTaskItemByIdQuery>());
    assert!(registry.contains::<GetTaskItemsPagedQuery>());
    assert!(registry.contains::<GetTaskItemStatsQuery>());
}

#[tokio::test]
async fn test_dispatcher_clones_share_registry() {
    let dispatcher = tasker::build_dispatcher(deps()).unwrap();
    let clone = dispatcher.clone();

    assert_eq!(clone.registry().len(), dispatcher.registry().len());
    let stats = clone.query(GetTaskItemStatsQuery).await.unwrap();
    assert_eq!(stats.total, 0);
}
