//! Unit of Work 模式
//!
//! 一次分发对应一个 Unit of Work；未提交即丢弃时所有写入回滚。

use async_trait::async_trait;
use tasker_errors::AppResult;

use super::repositories::{RefreshTokenRepository, TaskRepository, UserRepository};

/// Unit of Work trait
///
/// ```ignore
/// let uow = uow_factory.begin().await?;
/// uow.users().insert(&user).await?;
/// uow.refresh_tokens().insert(&token).await?;
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn refresh_tokens(&self) -> &dyn RefreshTokenRepository;

    fn tasks(&self) -> &dyn TaskRepository;

    /// 提交事务
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Unit of Work 工厂
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}
