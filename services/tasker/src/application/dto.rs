//! 数据传输对象

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasker_common::TaskId;

use crate::domain::repositories::TaskCounts;
use crate::domain::{Priority, TaskItem, TaskStatus};
use crate::error::AuthFailure;

/// 令牌对
///
/// `Debug` 输出不包含令牌内容。
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 访问令牌有效期（秒）
    pub expires_in: i64,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// 认证用例的结构化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(TokenPair),
    Rejected(AuthFailure),
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn tokens(&self) -> Option<&TokenPair> {
        match self {
            Self::Authenticated(tokens) => Some(tokens),
            Self::Rejected(_) => None,
        }
    }

    pub fn failure(&self) -> Option<AuthFailure> {
        match self {
            Self::Authenticated(_) => None,
            Self::Rejected(failure) => Some(*failure),
        }
    }

    /// 转换为 `AppResult`，业务失败映射为对应的 `AppError`
    pub fn into_result(self) -> tasker_errors::AppResult<TokenPair> {
        match self {
            Self::Authenticated(tokens) => Ok(tokens),
            Self::Rejected(failure) => Err(failure.into()),
        }
    }
}

/// 任务详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&TaskItem> for TaskDto {
    fn from(task: &TaskItem) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            status: task.status,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// 任务列表项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListItem {
    pub id: TaskId,
    pub title: String,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<TaskItem> for TaskListItem {
    fn from(task: TaskItem) -> Self {
        Self {
            id: task.id,
            title: task.title,
            priority: task.priority,
            status: task.status,
            due_date: task.due_date,
            created_at: task.created_at,
        }
    }
}

/// 任务统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatsDto {
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub archived: u64,
    pub total: u64,
}

impl From<TaskCounts> for TaskStatsDto {
    fn from(counts: TaskCounts) -> Self {
        Self {
            pending: counts.pending,
            in_progress: counts.in_progress,
            completed: counts.completed,
            archived: counts.archived,
            total: counts.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_debug_is_redacted() {
        let pair = TokenPair {
            access_token: "header.payload.sig".to_string(),
            refresh_token: "opaque-secret".to_string(),
            expires_in: 900,
        };
        let rendered = format!("{:?}", AuthOutcome::Authenticated(pair));
        assert!(!rendered.contains("opaque-secret"));
        assert!(!rendered.contains("payload"));
        assert!(rendered.contains("900"));
    }

    #[test]
    fn test_rejected_outcome_into_result() {
        let outcome = AuthOutcome::Rejected(AuthFailure::InvalidCredentials);
        assert!(!outcome.is_success());
        assert!(outcome.tokens().is_none());
        assert_eq!(outcome.into_result().unwrap_err().status_code(), 401);
    }
}
