//! 认证用例集成测试

mod common;

use chrono::{Duration, Utc};
use common::TestApp;
use futures::future::join_all;
use tasker::AuthFailure;
use tasker::application::commands::{
    LoginCommand, LogoutCommand, RefreshTokenCommand, RegisterCommand,
};
use tasker::application::dto::{AuthOutcome, TokenPair};
use tasker::domain::RefreshToken;
use tasker_auth_core::hash_token;
use tasker_common::UserId;
use tasker_errors::AppError;

async fn register(app: &TestApp, email: &str, password: &str) -> TokenPair {
    match app
        .dispatcher
        .send(RegisterCommand::new(email, password))
        .await
        .unwrap()
    {
        AuthOutcome::Authenticated(tokens) => tokens,
        other => panic!("register rejected: {other:?}"),
    }
}

#[tokio::test]
async fn test_register_issues_tokens_and_stores_only_hash() {
    let app = TestApp::new();
    let tokens = register(&app, "Alice@Example.com", "Secret123!").await;

    assert_eq!(tokens.expires_in, 15 * 60);
    let users = app.store.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "alice@example.com");

    let claims = app
        .token_service
        .validate_access_token(&tokens.access_token)
        .unwrap();
    assert_eq!(claims.user_id().unwrap(), users[0].id);
    assert_eq!(claims.iss, "Tasker");
    assert_eq!(claims.aud, "TaskerClient");

    let rows = app.store.refresh_tokens();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].token_hash, hash_token(&tokens.refresh_token));
    assert_ne!(rows[0].token_hash, tokens.refresh_token);
    assert!(rows[0].is_active(Utc::now()));
    assert!(rows[0].expires_at > Utc::now() + Duration::days(13));
}

#[tokio::test]
async fn test_register_keeps_client_metadata() {
    let app = TestApp::new();
    let command = RegisterCommand::new("meta@example.com", "pw")
        .with_client(Some("curl/8.0".to_string()), Some("10.0.0.7".to_string()));
    assert!(app.dispatcher.send(command).await.unwrap().is_success());

    let rows = app.store.refresh_tokens();
    assert_eq!(rows[0].user_agent.as_deref(), Some("curl/8.0"));
    assert_eq!(rows[0].ip_address.as_deref(), Some("10.0.0.7"));
}

#[tokio::test]
async fn test_register_duplicate_email_is_rejected_case_insensitively() {
    let app = TestApp::new();
    register(&app, "bob@example.com", "pw-1").await;

    let outcome = app
        .dispatcher
        .send(RegisterCommand::new("BOB@example.com", "pw-2"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        AuthOutcome::Rejected(AuthFailure::UserAlreadyExists)
    );
    assert_eq!(app.store.users().len(), 1);
    // 失败路径不生成刷新令牌
    assert_eq!(app.store.refresh_tokens().len(), 1);
}

#[tokio::test]
async fn test_login_errors_are_indistinguishable() {
    let app = TestApp::new();
    register(&app, "carol@example.com", "right-password").await;

    let unknown = app
        .dispatcher
        .send(LoginCommand::new("nobody@example.com", "right-password"))
        .await
        .unwrap();
    let wrong = app
        .dispatcher
        .send(LoginCommand::new("carol@example.com", "wrong-password"))
        .await
        .unwrap();

    assert_eq!(unknown, wrong);
    assert_eq!(
        unknown.failure().map(|f| f.message()),
        Some("Invalid email or password".to_string())
    );
    assert_eq!(app.store.refresh_tokens().len(), 1);
}

#[tokio::test]
async fn test_login_adds_session_without_touching_others() {
    let app = TestApp::new();
    let first = register(&app, "dave@example.com", "pw").await;

    let outcome = app
        .dispatcher
        .send(LoginCommand::new("Dave@Example.com", "pw"))
        .await
        .unwrap();
    let second = outcome.tokens().cloned().unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    let now = Utc::now();
    let rows = app.store.refresh_tokens();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.is_active(now)));
}

#[tokio::test]
async fn test_refresh_rotates_and_old_token_is_single_use() {
    let app = TestApp::new();
    let tokens = register(&app, "erin@example.com", "pw").await;

    let rotated = app
        .dispatcher
        .send(RefreshTokenCommand::new(tokens.refresh_token.clone()))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_ne!(rotated.refresh_token, tokens.refresh_token);

    let old_claims = app
        .token_service
        .validate_access_token(&tokens.access_token)
        .unwrap();
    let new_claims = app
        .token_service
        .validate_access_token(&rotated.access_token)
        .unwrap();
    assert_eq!(old_claims.sub, new_claims.sub);

    let replay = app
        .dispatcher
        .send(RefreshTokenCommand::new(tokens.refresh_token.clone()))
        .await
        .unwrap();
    assert_eq!(
        replay,
        AuthOutcome::Rejected(AuthFailure::InvalidOrExpiredToken)
    );

    let rows = app.store.refresh_tokens();
    let old = rows
        .iter()
        .find(|r| r.token_hash == hash_token(&tokens.refresh_token))
        .unwrap();
    let new = rows
        .iter()
        .find(|r| r.token_hash == hash_token(&rotated.refresh_token))
        .unwrap();
    assert!(old.revoked_at.is_some());
    assert!(new.is_active(Utc::now()));
    assert_eq!(new.user_id, old.user_id);
    assert!(new.user_agent.is_none());
}

#[tokio::test]
async fn test_refresh_rejects_unknown_and_expired_tokens() {
    let app = TestApp::new();

    let unknown = app
        .dispatcher
        .send(RefreshTokenCommand::new("never-issued"))
        .await
        .unwrap();
    assert_eq!(
        unknown.failure(),
        Some(AuthFailure::InvalidOrExpiredToken)
    );

    // 直接写入一条已过期的记录
    let past = Utc::now() - Duration::days(20);
    let expired = RefreshToken::issue(
        UserId::new(),
        hash_token("expired-secret"),
        past,
        past + Duration::days(14),
    );
    {
        use tasker::domain::UnitOfWorkFactory;
        let uow = app.store.begin().await.unwrap();
        uow.refresh_tokens().insert(&expired).await.unwrap();
        uow.commit().await.unwrap();
    }

    let outcome = app
        .dispatcher
        .send(RefreshTokenCommand::new("expired-secret"))
        .await
        .unwrap();
    assert_eq!(
        outcome.failure(),
        Some(AuthFailure::InvalidOrExpiredToken)
    );
    assert_eq!(app.store.refresh_tokens().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_has_exactly_one_winner() {
    let app = TestApp::new();
    let tokens = register(&app, "frank@example.com", "pw").await;

    let attempts = (0..8).map(|_| {
        let dispatcher = app.dispatcher.clone();
        let secret = tokens.refresh_token.clone();
        tokio::spawn(async move { dispatcher.send(RefreshTokenCommand::new(secret)).await })
    });
    let outcomes: Vec<AuthOutcome> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let winners = outcomes.iter().filter(|o| o.is_success()).count();
    assert_eq!(winners, 1);
    assert!(
        outcomes
            .iter()
            .filter(|o| !o.is_success())
            .all(|o| o.failure() == Some(AuthFailure::InvalidOrExpiredToken))
    );

    // 注册时的一条 + 唯一成功轮换的一条
    assert_eq!(app.store.refresh_tokens().len(), 2);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let app = TestApp::new();
    let tokens = register(&app, "grace@example.com", "pw").await;

    let first = app
        .dispatcher
        .send(LogoutCommand::new(tokens.refresh_token.clone()))
        .await
        .unwrap();
    let second = app
        .dispatcher
        .send(LogoutCommand::new(tokens.refresh_token.clone()))
        .await
        .unwrap();
    let unknown = app
        .dispatcher
        .send(LogoutCommand::new("never-issued"))
        .await
        .unwrap();

    assert!(first);
    assert!(!second);
    assert!(!unknown);

    let refresh = app
        .dispatcher
        .send(RefreshTokenCommand::new(tokens.refresh_token))
        .await
        .unwrap();
    assert!(!refresh.is_success());
}

#[tokio::test]
async fn test_invalid_input_never_reaches_handler() {
    let app = TestApp::new();

    let err = app
        .dispatcher
        .send(RegisterCommand::new("", ""))
        .await
        .unwrap_err();

    match err {
        AppError::ValidationFailed(errors) => {
            assert!(errors.contains("email", "Email is required"));
            assert!(errors.contains("password", "Password is required"));
            assert_eq!(errors.len(), 2);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(app.store.users().is_empty());

    let err = app
        .dispatcher
        .send(RefreshTokenCommand::new("  "))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}
