//! PostgreSQL Unit of Work 实现
//!
//! 使用 SQLx Transaction 提供事务协调能力。未提交的事务在丢弃时回滚。

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tasker_errors::{AppError, AppResult};
use tokio::sync::Mutex;

use super::tx_repositories::{
    SharedTx, TxRefreshTokenRepository, TxTaskRepository, TxUserRepository,
};
use crate::domain::repositories::{RefreshTokenRepository, TaskRepository, UserRepository};
use crate::domain::{UnitOfWork, UnitOfWorkFactory};

/// PostgreSQL Unit of Work 工厂
pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PostgresUnitOfWork::new(tx)))
    }
}

/// PostgreSQL Unit of Work
///
/// 所有 Repository 操作都在同一个事务中执行。
pub struct PostgresUnitOfWork {
    tx: SharedTx,
    user_repo: TxUserRepository,
    refresh_token_repo: TxRefreshTokenRepository,
    task_repo: TxTaskRepository,
}

impl PostgresUnitOfWork {
    fn new(tx: sqlx::Transaction<'static, sqlx::Postgres>) -> Self {
        let tx: SharedTx = Arc::new(Mutex::new(Some(tx)));

        Self {
            user_repo: TxUserRepository::new(tx.clone()),
            refresh_token_repo: TxRefreshTokenRepository::new(tx.clone()),
            task_repo: TxTaskRepository::new(tx.clone()),
            tx,
        }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.user_repo
    }

    fn refresh_tokens(&self) -> &dyn RefreshTokenRepository {
        &self.refresh_token_repo
    }

    fn tasks(&self) -> &dyn TaskRepository {
        &self.task_repo
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))?;

        Ok(())
    }
}
