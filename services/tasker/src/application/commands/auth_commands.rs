//! 认证命令
//!
//! 这些命令携带密码或刷新令牌，因此不派生 `Debug`。

use tasker_cqrs_core::Command;

use crate::application::dto::AuthOutcome;

/// 注册
#[derive(Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl RegisterCommand {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            user_agent: None,
            ip_address: None,
        }
    }

    pub fn with_client(mut self, user_agent: Option<String>, ip_address: Option<String>) -> Self {
        self.user_agent = user_agent;
        self.ip_address = ip_address;
        self
    }
}

impl Command for RegisterCommand {
    type Result = AuthOutcome;
}

/// 登录
#[derive(Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl LoginCommand {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            user_agent: None,
            ip_address: None,
        }
    }

    pub fn with_client(mut self, user_agent: Option<String>, ip_address: Option<String>) -> Self {
        self.user_agent = user_agent;
        self.ip_address = ip_address;
        self
    }
}

impl Command for LoginCommand {
    type Result = AuthOutcome;
}

/// 刷新令牌轮换
#[derive(Clone)]
pub struct RefreshTokenCommand {
    pub refresh_token: String,
}

impl RefreshTokenCommand {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
        }
    }
}

impl Command for RefreshTokenCommand {
    type Result = AuthOutcome;
}

/// 登出（吊销刷新令牌），返回是否确有记录被吊销
#[derive(Clone)]
pub struct LogoutCommand {
    pub refresh_token: String,
}

impl LogoutCommand {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
        }
    }
}

impl Command for LogoutCommand {
    type Result = bool;
}
