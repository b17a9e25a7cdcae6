//! 事务感知的 Repository 实现
//!
//! 这些 Repository 使用 Unit of Work 共享的 Transaction 而非 PgPool。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use tasker_adapter_postgres::map_sqlx_error;
use tasker_common::{Pagination, TaskId};
use tasker_errors::{AppError, AppResult};
use tasker_ports::Repository;
use tokio::sync::Mutex;

use super::rows::{RefreshTokenRow, TaskItemRow, UserRow};
use crate::domain::repositories::{
    RefreshTokenRepository, TaskCounts, TaskFilter, TaskRepository, TaskSort, UserRepository,
};
use crate::domain::{RefreshToken, TaskItem, TaskStatus, User};

/// 共享事务类型
pub(super) type SharedTx = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// 宏：定义一个持有共享事务的 TxRepository
macro_rules! define_tx_repo {
    ($name:ident) => {
        pub(super) struct $name {
            tx: SharedTx,
        }

        impl $name {
            pub(super) fn new(tx: SharedTx) -> Self {
                Self { tx }
            }
        }
    };
}

define_tx_repo!(TxUserRepository);
define_tx_repo!(TxRefreshTokenRepository);
define_tx_repo!(TxTaskRepository);

const REFRESH_TOKEN_COLUMNS: &str =
    "id, user_id, token_hash, created_at, expires_at, revoked_at, user_agent, ip_address";

const TASK_COLUMNS: &str =
    "id, title, description, priority, status, due_date, created_at, updated_at";

/// 任务过滤条件（$1 status, $2 priority, $3 search）
const TASK_FILTER: &str = r#"
    WHERE ($1::smallint IS NULL OR status = $1)
      AND ($2::smallint IS NULL OR priority = $2)
      AND ($3::text IS NULL OR strpos(title, $3) > 0 OR strpos(COALESCE(description, ''), $3) > 0)
"#;

// =============================================================================
// UserRepository 实现
// =============================================================================

#[async_trait]
impl UserRepository for TxUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, created_at FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to find user by email", e))?;

        Ok(row.map(User::from))
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id.0)
        .bind(&user.email)
        .bind(user.password_hash.as_str())
        .bind(user.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to insert user", e))?;

        Ok(())
    }
}

// =============================================================================
// RefreshTokenRepository 实现
// =============================================================================

#[async_trait]
impl RefreshTokenRepository for TxRefreshTokenRepository {
    async fn insert(&self, token: &RefreshToken) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, created_at, expires_at,
                                        revoked_at, user_agent, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(token.id.0)
        .bind(token.user_id.0)
        .bind(&token.token_hash)
        .bind(token.created_at)
        .bind(token.expires_at)
        .bind(token.revoked_at)
        .bind(&token.user_agent)
        .bind(&token.ip_address)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to insert refresh token", e))?;

        Ok(())
    }

    async fn revoke_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<RefreshToken>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        // 单条条件更新：并发事务在行锁上排队，提交后重新评估条件，只有一个能命中
        let sql = format!(
            "UPDATE refresh_tokens SET revoked_at = $2 \
             WHERE token_hash = $1 AND revoked_at IS NULL AND expires_at > $2 \
             RETURNING {}",
            REFRESH_TOKEN_COLUMNS
        );
        let row = sqlx::query_as::<_, RefreshTokenRow>(&sql)
            .bind(token_hash)
            .bind(now)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to revoke refresh token", e))?;

        Ok(row.map(RefreshToken::from))
    }
}

// =============================================================================
// TaskRepository 实现
// =============================================================================

#[async_trait]
impl Repository<TaskItem, TaskId> for TxTaskRepository {
    async fn find_by_id(&self, id: &TaskId) -> AppResult<Option<TaskItem>> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let sql = format!("SELECT {} FROM task_items WHERE id = $1", TASK_COLUMNS);
        let row = sqlx::query_as::<_, TaskItemRow>(&sql)
            .bind(id.0)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to find task", e))?;

        row.map(TaskItemRow::into_task).transpose()
    }

    async fn save(&self, task: &TaskItem) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(
            r#"
            INSERT INTO task_items (id, title, description, priority, status, due_date,
                                    created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                priority = EXCLUDED.priority,
                status = EXCLUDED.status,
                due_date = EXCLUDED.due_date,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(task.id.0)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.as_i16())
        .bind(task.status.as_i16())
        .bind(task.due_date)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to save task", e))?;

        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> AppResult<bool> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let result = sqlx::query("DELETE FROM task_items WHERE id = $1")
            .bind(id.0)
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete task", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskRepository for TxTaskRepository {
    async fn list(
        &self,
        filter: &TaskFilter,
        sort: TaskSort,
        pagination: &Pagination,
    ) -> AppResult<(Vec<TaskItem>, u64)> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let status = filter.status.map(TaskStatus::as_i16);
        let priority = filter.priority.map(|p| p.as_i16());

        let count_sql = format!("SELECT COUNT(*) FROM task_items {}", TASK_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(status)
            .bind(priority)
            .bind(filter.search.as_deref())
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to count tasks", e))?;

        let page_sql = format!(
            "SELECT {} FROM task_items {} ORDER BY {} LIMIT $4 OFFSET $5",
            TASK_COLUMNS,
            TASK_FILTER,
            sort.order_by_sql()
        );
        let rows = sqlx::query_as::<_, TaskItemRow>(&page_sql)
            .bind(status)
            .bind(priority)
            .bind(filter.search.as_deref())
            .bind(i64::from(pagination.page_size))
            .bind(i64::from(pagination.offset()))
            .fetch_all(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to list tasks", e))?;

        let tasks = rows
            .into_iter()
            .map(TaskItemRow::into_task)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((tasks, total.max(0) as u64))
    }

    async fn count_by_status(&self) -> AppResult<TaskCounts> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let rows: Vec<(i16, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM task_items GROUP BY status")
                .fetch_all(&mut **tx)
                .await
                .map_err(|e| map_sqlx_error("Failed to count tasks by status", e))?;

        let mut counts = TaskCounts::default();
        for (status, count) in rows {
            counts.add(TaskStatus::from_i16(status)?, count.max(0) as u64);
        }
        Ok(counts)
    }
}
