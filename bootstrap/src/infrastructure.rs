//! 基础设施资源管理

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tasker_adapter_postgres::{PostgresConfig, create_pool};
use tasker_auth_core::TokenService;
use tasker_config::AppConfig;
use tasker_errors::AppResult;
use tracing::info;

use crate::retry::{RetryConfig, is_retryable, with_retry_if};

/// 基础设施资源容器
pub struct Infrastructure {
    postgres_pool: PgPool,
    token_service: Arc<TokenService>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    ///
    /// 签名密钥缺失立即失败，不会尝试连接数据库。
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let token_service = Arc::new(TokenService::from_config(&config.jwt)?);

        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections);
        let postgres_pool = with_retry_if(
            &RetryConfig::default(),
            "PostgreSQL connection",
            || {
                let cfg = pg_config.clone();
                async move { create_pool(&cfg).await }
            },
            is_retryable,
        )
        .await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        Ok(Self {
            postgres_pool,
            token_service,
        })
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    /// 进程内共享的 Token 服务
    pub fn token_service(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }
}
