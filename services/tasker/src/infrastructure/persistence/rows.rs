//! 数据库行映射

use chrono::{DateTime, Utc};
use tasker_common::{RefreshTokenId, TaskId, UserId};
use tasker_errors::AppResult;
use uuid::Uuid;

use crate::domain::{HashedPassword, Priority, RefreshToken, TaskItem, TaskStatus, User};

#[derive(Debug, sqlx::FromRow)]
pub(super) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            password_hash: HashedPassword::from_hash(row.password_hash),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct RefreshTokenRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl From<RefreshTokenRow> for RefreshToken {
    fn from(row: RefreshTokenRow) -> Self {
        Self {
            id: RefreshTokenId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            token_hash: row.token_hash,
            created_at: row.created_at,
            expires_at: row.expires_at,
            revoked_at: row.revoked_at,
            user_agent: row.user_agent,
            ip_address: row.ip_address,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct TaskItemRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: i16,
    pub status: i16,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskItemRow {
    pub fn into_task(self) -> AppResult<TaskItem> {
        Ok(TaskItem {
            id: TaskId::from_uuid(self.id),
            title: self.title,
            description: self.description,
            priority: Priority::from_i16(self.priority)?,
            status: TaskStatus::from_i16(self.status)?,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
