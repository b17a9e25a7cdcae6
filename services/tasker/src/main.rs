//! Tasker Service - 服务入口
//!
//! 使用 tasker-bootstrap 统一启动模式

use std::sync::Arc;

use sqlx::migrate::Migrator;
use tasker::infrastructure::audit::TracingAuditSink;
use tasker::infrastructure::persistence::PostgresUnitOfWorkFactory;
use tasker::infrastructure::push::BroadcastPushChannel;
use tasker::{ServiceDeps, build_dispatcher};
use tasker_adapter_postgres::{check_connection, run_migrations};
use tasker_bootstrap::{Infrastructure, run};
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run("config", |infra: Infrastructure| async move {
        let pool = infra.postgres_pool();
        check_connection(&pool).await?;
        run_migrations(&pool, &MIGRATOR).await?;

        // 组装依赖
        let deps = ServiceDeps {
            uow_factory: Arc::new(PostgresUnitOfWorkFactory::new(pool)),
            token_service: infra.token_service(),
            audit: Arc::new(TracingAuditSink),
            push: Arc::new(BroadcastPushChannel::default()),
        };

        // 注册表不完整时直接失败
        let dispatcher = build_dispatcher(deps)?;
        info!(
            handlers = dispatcher.registry().len(),
            "Request dispatcher assembled"
        );

        Ok(dispatcher)
    })
    .await
}
