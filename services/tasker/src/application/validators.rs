//! 请求校验器
//!
//! 校验器无状态，只返回 (field, message) 列表；同一请求的多个校验器由校验阶段并发执行。

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use email_address::EmailAddress;
use tasker_cqrs_core::Validator;
use tasker_errors::FieldError;

use super::commands::{
    CreateTaskItemCommand, LoginCommand, LogoutCommand, RefreshTokenCommand, RegisterCommand,
    UpdateTaskItemCommand,
};
use super::queries::GetTaskItemsPagedQuery;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;
pub const PAGE_SIZE_MAX: u32 = 100;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if is_blank(email) {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !EmailAddress::is_valid(email.trim()) {
        errors.push(FieldError::new("email", "Email must be a valid email address"));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
}

fn check_refresh_token(token: &str, errors: &mut Vec<FieldError>) {
    if is_blank(token) {
        errors.push(FieldError::new("refreshToken", "Refresh token is required"));
    }
}

fn check_task_fields(
    title: &str,
    description: Option<&str>,
    due_date: Option<DateTime<Utc>>,
    errors: &mut Vec<FieldError>,
) {
    if is_blank(title) {
        errors.push(FieldError::new("title", "Title is required"));
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.push(FieldError::new("title", "Title cannot exceed 200 characters"));
    }

    if description.is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_CHARS) {
        errors.push(FieldError::new(
            "description",
            "Description cannot exceed 2000 characters",
        ));
    }

    // 允许一天以内的过去时间
    if due_date.is_some_and(|due| due <= Utc::now() - Duration::days(1)) {
        errors.push(FieldError::new("dueDate", "Due date cannot be in the far past"));
    }
}

/// 注册校验
pub struct RegisterCommandValidator;

#[async_trait]
impl Validator<RegisterCommand> for RegisterCommandValidator {
    async fn validate(&self, command: &RegisterCommand) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_email(&command.email, &mut errors);
        check_password(&command.password, &mut errors);
        errors
    }
}

/// 登录校验
pub struct LoginCommandValidator;

#[async_trait]
impl Validator<LoginCommand> for LoginCommandValidator {
    async fn validate(&self, command: &LoginCommand) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_email(&command.email, &mut errors);
        check_password(&command.password, &mut errors);
        errors
    }
}

pub struct RefreshTokenCommandValidator;

#[async_trait]
impl Validator<RefreshTokenCommand> for RefreshTokenCommandValidator {
    async fn validate(&self, command: &RefreshTokenCommand) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_refresh_token(&command.refresh_token, &mut errors);
        errors
    }
}

pub struct LogoutCommandValidator;

#[async_trait]
impl Validator<LogoutCommand> for LogoutCommandValidator {
    async fn validate(&self, command: &LogoutCommand) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_refresh_token(&command.refresh_token, &mut errors);
        errors
    }
}

/// 创建任务校验
pub struct CreateTaskItemCommandValidator;

#[async_trait]
impl Validator<CreateTaskItemCommand> for CreateTaskItemCommandValidator {
    async fn validate(&self, command: &CreateTaskItemCommand) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_task_fields(
            &command.title,
            command.description.as_deref(),
            command.due_date,
            &mut errors,
        );
        errors
    }
}

/// 更新任务校验
pub struct UpdateTaskItemCommandValidator;

#[async_trait]
impl Validator<UpdateTaskItemCommand> for UpdateTaskItemCommandValidator {
    async fn validate(&self, command: &UpdateTaskItemCommand) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if command.id.is_nil() {
            errors.push(FieldError::new("id", "Task ID is required"));
        }
        check_task_fields(
            &command.title,
            command.description.as_deref(),
            command.due_date,
            &mut errors,
        );
        errors
    }
}

/// 分页参数校验
pub struct GetTaskItemsPagedQueryValidator;

#[async_trait]
impl Validator<GetTaskItemsPagedQuery> for GetTaskItemsPagedQueryValidator {
    async fn validate(&self, query: &GetTaskItemsPagedQuery) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if query.page < 1 {
            errors.push(FieldError::new("page", "Page must be at least 1"));
        }
        if query.page_size < 1 || query.page_size > PAGE_SIZE_MAX {
            errors.push(FieldError::new(
                "pageSize",
                "Page size must be between 1 and 100",
            ));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use tasker_common::TaskId;
    use uuid::Uuid;

    fn create(title: &str) -> CreateTaskItemCommand {
        CreateTaskItemCommand {
            title: title.to_string(),
            description: None,
            priority: Priority::Low,
            due_date: None,
        }
    }

    #[tokio::test]
    async fn test_login_requires_email_and_password() {
        let errors = LoginCommandValidator
            .validate(&LoginCommand::new("", ""))
            .await;
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&FieldError::new("email", "Email is required")));
        assert!(errors.contains(&FieldError::new("password", "Password is required")));
    }

    #[tokio::test]
    async fn test_invalid_email_format() {
        let errors = RegisterCommandValidator
            .validate(&RegisterCommand::new("not-an-email", "pw"))
            .await;
        assert_eq!(
            errors,
            vec![FieldError::new("email", "Email must be a valid email address")]
        );
    }

    #[tokio::test]
    async fn test_title_limits() {
        assert!(CreateTaskItemCommandValidator.validate(&create("ok")).await.is_empty());

        let blank = CreateTaskItemCommandValidator.validate(&create("   ")).await;
        assert_eq!(blank, vec![FieldError::new("title", "Title is required")]);

        let long = "x".repeat(TITLE_MAX_CHARS + 1);
        let too_long = CreateTaskItemCommandValidator.validate(&create(&long)).await;
        assert_eq!(
            too_long,
            vec![FieldError::new("title", "Title cannot exceed 200 characters")]
        );

        // 按字符计数，而非字节
        let exact = "é".repeat(TITLE_MAX_CHARS);
        assert!(CreateTaskItemCommandValidator.validate(&create(&exact)).await.is_empty());
    }

    #[tokio::test]
    async fn test_due_date_window() {
        let mut command = create("ok");
        command.due_date = Some(Utc::now() - Duration::hours(12));
        assert!(CreateTaskItemCommandValidator.validate(&command).await.is_empty());

        command.due_date = Some(Utc::now() - Duration::days(2));
        let errors = CreateTaskItemCommandValidator.validate(&command).await;
        assert_eq!(errors[0].field, "dueDate");
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let command = UpdateTaskItemCommand {
            id: TaskId::from_uuid(Uuid::nil()),
            title: "ok".to_string(),
            description: Some("d".repeat(DESCRIPTION_MAX_CHARS + 1)),
            priority: Priority::High,
            status: crate::domain::TaskStatus::Pending,
            due_date: None,
        };
        let errors = UpdateTaskItemCommandValidator.validate(&command).await;
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.field == "id"));
        assert!(errors.iter().any(|e| e.field == "description"));
    }

    #[tokio::test]
    async fn test_paging_bounds() {
        let query = GetTaskItemsPagedQuery {
            page: 0,
            page_size: 500,
            ..Default::default()
        };
        let errors = GetTaskItemsPagedQueryValidator.validate(&query).await;
        assert_eq!(errors.len(), 2);
    }
}
