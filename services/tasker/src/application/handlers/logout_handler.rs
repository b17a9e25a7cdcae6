//! 登出处理器

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tasker_auth_core::TokenService;
use tasker_cqrs_core::CommandHandler;
use tasker_errors::AppResult;
use tracing::debug;

use crate::application::commands::LogoutCommand;
use crate::domain::UnitOfWorkFactory;
use crate::infrastructure::observability::metrics;

/// 登出：吊销匹配的有效刷新令牌，幂等
pub struct LogoutHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    token_service: Arc<TokenService>,
}

impl LogoutHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, token_service: Arc<TokenService>) -> Self {
        Self {
            uow_factory,
            token_service,
        }
    }
}

#[async_trait]
impl CommandHandler<LogoutCommand> for LogoutHandler {
    async fn handle(&self, command: LogoutCommand) -> AppResult<bool> {
        let token_hash = self.token_service.hash_token(&command.refresh_token);
        let uow = self.uow_factory.begin().await?;

        let revoked = uow
            .refresh_tokens()
            .revoke_active(&token_hash, Utc::now())
            .await?;
        uow.commit().await?;

        if let Some(token) = &revoked {
            debug!(user_id = %token.user_id, "Refresh token revoked on logout");
        }
        metrics::record_logout(revoked.is_some());
        Ok(revoked.is_some())
    }
}
