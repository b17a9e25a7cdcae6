//! tasker-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

mod validation;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use validation::*;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn validation_failed(errors: ValidationErrors) -> Self {
        Self::ValidationFailed(errors)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn external_service(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    /// 是否为配置类错误（启动期或首次使用即失败，不重试）
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// 是否为基础设施错误
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::Internal(_) | Self::Database(_) | Self::ExternalService(_) | Self::Configuration(_)
        )
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::ValidationFailed(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Conflict(_) => 409,
            Self::Configuration(_) => 500,
            Self::Internal(_) => 500,
            Self::Database(_) => 500,
            Self::ExternalService(_) => 502,
        }
    }

    /// 转换为 Problem Details
    ///
    /// 基础设施错误只返回通用描述，不暴露内部细节。
    pub fn to_problem_details(&self) -> ProblemDetails {
        let detail = if self.is_infrastructure() {
            "An unexpected error occurred.".to_string()
        } else if let Self::ValidationFailed(_) = self {
            "See the errors property for details.".to_string()
        } else {
            self.to_string()
        };

        let errors = match self {
            Self::ValidationFailed(errors) => Some(errors.by_field()),
            _ => None,
        };

        ProblemDetails {
            r#type: self.problem_type().to_string(),
            title: self.problem_title().to_string(),
            status: self.status_code(),
            detail,
            instance: None,
            errors,
        }
    }

    fn problem_type(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "https://tools.ietf.org/html/rfc7231#section-6.5.4",
            Self::Validation(_) | Self::ValidationFailed(_) => {
                "https://tools.ietf.org/html/rfc7231#section-6.5.1"
            }
            Self::Unauthorized(_) => "https://tools.ietf.org/html/rfc7235#section-3.1",
            Self::Forbidden(_) => "https://tools.ietf.org/html/rfc7231#section-6.5.3",
            Self::Conflict(_) => "https://tools.ietf.org/html/rfc7231#section-6.5.8",
            Self::ExternalService(_) => "https://tools.ietf.org/html/rfc7231#section-6.6.3",
            Self::Configuration(_) | Self::Internal(_) | Self::Database(_) => {
                "https://tools.ietf.org/html/rfc7231#section-6.6.1"
            }
        }
    }

    fn problem_title(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Validation(_) => "Bad Request",
            Self::ValidationFailed(_) => "One or more validation errors occurred.",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Forbidden(_) => "Forbidden",
            Self::Conflict(_) => "Conflict",
            Self::ExternalService(_) => "External Service Error",
            Self::Configuration(_) | Self::Internal(_) | Self::Database(_) => {
                "An error occurred while processing your request."
            }
        }
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::not_found("x").status_code(), 404);
        assert_eq!(AppError::conflict("x").status_code(), 409);
        assert_eq!(
            AppError::validation_failed(ValidationErrors::new()).status_code(),
            400
        );
        assert_eq!(AppError::configuration("x").status_code(), 500);
    }

    #[test]
    fn test_problem_details_hides_infrastructure_detail() {
        let problem = AppError::database("connection refused at 10.0.0.3").to_problem_details();
        assert_eq!(problem.status, 500);
        assert!(!problem.detail.contains("10.0.0.3"));
    }

    #[test]
    fn test_problem_details_groups_validation_errors() {
        let mut errors = ValidationErrors::new();
        errors.add("Title", "Title is required");
        errors.add("Description", "Description cannot exceed 2000 characters");

        let problem = AppError::validation_failed(errors).to_problem_details();
        let grouped = problem.errors.as_ref().expect("validation errors present");

        assert_eq!(problem.status, 400);
        assert_eq!(grouped["Title"], vec!["Title is required".to_string()]);

        let json = serde_json::to_value(&problem).unwrap();
        assert!(json.get("errors").is_some());
        assert!(json.get("instance").is_none());
    }
}
