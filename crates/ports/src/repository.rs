//! Repository trait 定义

use async_trait::async_trait;
use tasker_errors::AppResult;

/// 基础 Repository trait
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// 根据 ID 查找
    async fn find_by_id(&self, id: &ID) -> AppResult<Option<T>>;

    /// 保存实体（插入或更新）
    async fn save(&self, entity: &T) -> AppResult<()>;

    /// 删除实体，返回是否存在
    async fn delete(&self, id: &ID) -> AppResult<bool>;
}
