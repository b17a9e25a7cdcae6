//! 认证业务失败
//!
//! 认证用例以结构化结果返回业务失败，不抛出错误；需要时可转换为 `AppError`。

use tasker_errors::AppError;
use thiserror::Error;

/// 认证失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("User with this email already exists")]
    UserAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired refresh token")]
    InvalidOrExpiredToken,
}

impl AuthFailure {
    /// 稳定的错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserAlreadyExists => "user_already_exists",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidOrExpiredToken => "invalid_or_expired_token",
        }
    }

    /// 面向用户的错误信息
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        match failure {
            AuthFailure::UserAlreadyExists => AppError::conflict(failure.message()),
            AuthFailure::InvalidCredentials | AuthFailure::InvalidOrExpiredToken => {
                AppError::unauthorized(failure.message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            AuthFailure::InvalidCredentials.message(),
            "Invalid email or password"
        );
        assert_eq!(
            AuthFailure::InvalidOrExpiredToken.message(),
            "Invalid or expired refresh token"
        );
        assert_eq!(
            AuthFailure::UserAlreadyExists.message(),
            "User with this email already exists"
        );
    }

    #[test]
    fn test_into_app_error() {
        assert_eq!(AppError::from(AuthFailure::UserAlreadyExists).status_code(), 409);
        assert_eq!(AppError::from(AuthFailure::InvalidCredentials).status_code(), 401);
        assert_eq!(AuthFailure::InvalidOrExpiredToken.code(), "invalid_or_expired_token");
    }
}
