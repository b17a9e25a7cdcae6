//! 令牌对签发

use chrono::Utc;
use tasker_auth_core::TokenService;
use tasker_common::UserId;
use tasker_errors::AppResult;

use crate::application::dto::TokenPair;
use crate::domain::{RefreshToken, UnitOfWork};

/// 生成令牌对并在当前 Unit of Work 中写入刷新令牌记录（只存哈希）
pub(super) async fn issue_token_pair(
    uow: &dyn UnitOfWork,
    token_service: &TokenService,
    user_id: &UserId,
    user_agent: Option<String>,
    ip_address: Option<String>,
) -> AppResult<TokenPair> {
    let now = Utc::now();
    let refresh_token = token_service.generate_refresh_token();
    let record = RefreshToken::issue(
        *user_id,
        token_service.hash_token(&refresh_token),
        now,
        token_service.refresh_token_expires_at(now),
    )
    .with_client(user_agent, ip_address);
    uow.refresh_tokens().insert(&record).await?;

    let access_token = token_service.generate_access_token(user_id)?;

    Ok(TokenPair {
        access_token: access_token.token,
        refresh_token,
        expires_in: token_service.access_token_expires_in(),
    })
}
