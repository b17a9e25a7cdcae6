//! 登录处理器

use std::sync::Arc;

use async_trait::async_trait;
use tasker_auth_core::TokenService;
use tasker_common::normalize_email;
use tasker_cqrs_core::CommandHandler;
use tasker_errors::AppResult;
use tracing::{debug, info};

use super::token_issuer::issue_token_pair;
use crate::application::commands::LoginCommand;
use crate::application::dto::AuthOutcome;
use crate::domain::UnitOfWorkFactory;
use crate::error::AuthFailure;
use crate::infrastructure::observability::metrics;

/// 登录
///
/// 未知邮箱与密码错误返回同一个失败结果；已有的其他会话不受影响。
pub struct LoginHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    token_service: Arc<TokenService>,
}

impl LoginHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, token_service: Arc<TokenService>) -> Self {
        Self {
            uow_factory,
            token_service,
        }
    }

    fn rejected() -> AuthOutcome {
        metrics::record_login(false);
        AuthOutcome::Rejected(AuthFailure::InvalidCredentials)
    }
}

#[async_trait]
impl CommandHandler<LoginCommand> for LoginHandler {
    async fn handle(&self, command: LoginCommand) -> AppResult<AuthOutcome> {
        let email = normalize_email(&command.email);
        let uow = self.uow_factory.begin().await?;

        let Some(user) = uow.users().find_by_email(&email).await? else {
            debug!("Login rejected: unknown email");
            return Ok(Self::rejected());
        };

        if !user.verify_password(&command.password)? {
            debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Ok(Self::rejected());
        }

        let tokens = issue_token_pair(
            uow.as_ref(),
            &self.token_service,
            &user.id,
            command.user_agent,
            command.ip_address,
        )
        .await?;
        uow.commit().await?;

        info!(user_id = %user.id, "User logged in");
        metrics::record_login(true);
        Ok(AuthOutcome::Authenticated(tokens))
    }
}
