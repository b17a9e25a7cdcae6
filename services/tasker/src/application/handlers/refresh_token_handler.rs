//! 刷新令牌轮换处理器

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tasker_auth_core::TokenService;
use tasker_cqrs_core::CommandHandler;
use tasker_errors::AppResult;
use tracing::{debug, warn};

use super::token_issuer::issue_token_pair;
use crate::application::commands::RefreshTokenCommand;
use crate::application::dto::AuthOutcome;
use crate::domain::UnitOfWorkFactory;
use crate::error::AuthFailure;
use crate::infrastructure::observability::metrics;

/// 刷新令牌轮换
///
/// 旧令牌通过一次条件更新吊销；未命中（不存在、已过期、已吊销）统一返回
/// `InvalidOrExpiredToken`。新令牌继承同一用户，不携带客户端信息。
pub struct RefreshTokenHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    token_service: Arc<TokenService>,
}

impl RefreshTokenHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, token_service: Arc<TokenService>) -> Self {
        Self {
            uow_factory,
            token_service,
        }
    }
}

#[async_trait]
impl CommandHandler<RefreshTokenCommand> for RefreshTokenHandler {
    async fn handle(&self, command: RefreshTokenCommand) -> AppResult<AuthOutcome> {
        let token_hash = self.token_service.hash_token(&command.refresh_token);
        let now = Utc::now();
        let uow = self.uow_factory.begin().await?;

        let Some(revoked) = uow.refresh_tokens().revoke_active(&token_hash, now).await? else {
            // 可能是重放
            warn!("Refresh token rejected: unknown, expired or already revoked");
            metrics::record_refresh(false);
            return Ok(AuthOutcome::Rejected(AuthFailure::InvalidOrExpiredToken));
        };

        let tokens =
            issue_token_pair(uow.as_ref(), &self.token_service, &revoked.user_id, None, None)
                .await?;
        uow.commit().await?;

        debug!(user_id = %revoked.user_id, "Refresh token rotated");
        metrics::record_refresh(true);
        Ok(AuthOutcome::Authenticated(tokens))
    }
}
