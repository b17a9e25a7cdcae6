//! 注册处理器

use std::sync::Arc;

use async_trait::async_trait;
use tasker_auth_core::TokenService;
use tasker_common::normalize_email;
use tasker_cqrs_core::CommandHandler;
use tasker_errors::{AppError, AppResult};
use tracing::info;

use super::token_issuer::issue_token_pair;
use crate::application::commands::RegisterCommand;
use crate::application::dto::AuthOutcome;
use crate::domain::{HashedPassword, UnitOfWorkFactory, User};
use crate::error::AuthFailure;
use crate::infrastructure::observability::metrics;

pub struct RegisterHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    token_service: Arc<TokenService>,
}

impl RegisterHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, token_service: Arc<TokenService>) -> Self {
        Self {
            uow_factory,
            token_service,
        }
    }

    fn rejected() -> AuthOutcome {
        metrics::record_register(false);
        AuthOutcome::Rejected(AuthFailure::UserAlreadyExists)
    }
}

#[async_trait]
impl CommandHandler<RegisterCommand> for RegisterHandler {
    async fn handle(&self, command: RegisterCommand) -> AppResult<AuthOutcome> {
        let email = normalize_email(&command.email);
        let uow = self.uow_factory.begin().await?;

        if uow.users().find_by_email(&email).await?.is_some() {
            return Ok(Self::rejected());
        }

        let password_hash = HashedPassword::from_plain(&command.password)?;
        let user = User::new(&email, password_hash);

        // 并发注册同一邮箱时由唯一约束兜底
        match uow.users().insert(&user).await {
            Ok(()) => {}
            Err(AppError::Conflict(_)) => return Ok(Self::rejected()),
            Err(e) => return Err(e),
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

        info!(user_id = %user.id, "User registered");
        metrics::record_register(true);
        Ok(AuthOutcome::Authenticated(tokens))
    }
}
