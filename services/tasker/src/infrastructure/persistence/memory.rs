//! 内存持久化
//!
//! 所有 Unit of Work 共享同一份状态。写入立即生效并记入撤销日志；
//! 未提交即丢弃或显式回滚时按逆序撤销。条件吊销在同一临界区内完成。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tasker_common::{Pagination, RefreshTokenId, TaskId, UserId};
use tasker_errors::{AppError, AppResult};
use tasker_ports::Repository;

use crate::domain::repositories::{
    RefreshTokenRepository, TaskCounts, TaskFilter, TaskRepository, TaskSort, UserRepository,
};
use crate::domain::{RefreshToken, TaskItem, UnitOfWork, UnitOfWorkFactory, User};

#[derive(Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    refresh_tokens: HashMap<RefreshTokenId, RefreshToken>,
    tasks: HashMap<TaskId, TaskItem>,
}

enum UndoOp {
    RemoveUser(UserId),
    RemoveRefreshToken(RefreshTokenId),
    RestoreRefreshToken(RefreshToken),
    RemoveTask(TaskId),
    RestoreTask(TaskItem),
}

impl UndoOp {
    fn apply(self, state: &mut MemoryState) {
        match self {
            Self::RemoveUser(id) => {
                state.users.remove(&id);
            }
            Self::RemoveRefreshToken(id) => {
                state.refresh_tokens.remove(&id);
            }
            Self::RestoreRefreshToken(token) => {
                state.refresh_tokens.insert(token.id, token);
            }
            Self::RemoveTask(id) => {
                state.tasks.remove(&id);
            }
            Self::RestoreTask(task) => {
                state.tasks.insert(task.id, task);
            }
        }
    }
}

type SharedState = Arc<Mutex<MemoryState>>;
type Journal = Arc<Mutex<Vec<UndoOp>>>;

fn lock<T>(mutex: &Mutex<T>) -> AppResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| AppError::internal("In-memory store lock poisoned"))
}

/// 内存存储，同时作为 Unit of Work 工厂
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: SharedState,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已提交（或进行中）的用户快照
    pub fn users(&self) -> Vec<User> {
        self.state
            .lock()
            .map(|s| s.users.values().cloned().collect())
            .unwrap_or_default()
    }

    /// 刷新令牌记录快照
    pub fn refresh_tokens(&self) -> Vec<RefreshToken> {
        self.state
            .lock()
            .map(|s| s.refresh_tokens.values().cloned().collect())
            .unwrap_or_default()
    }

    /// 任务快照
    pub fn tasks(&self) -> Vec<TaskItem> {
        self.state
            .lock()
            .map(|s| s.tasks.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(InMemoryUnitOfWork::new(self.state.clone())))
    }
}

/// 内存 Unit of Work
pub struct InMemoryUnitOfWork {
    state: SharedState,
    journal: Journal,
    users: MemUserRepository,
    refresh_tokens: MemRefreshTokenRepository,
    tasks: MemTaskRepository,
    finished: bool,
}

impl InMemoryUnitOfWork {
    fn new(state: SharedState) -> Self {
        let journal: Journal = Arc::default();
        Self {
            users: MemUserRepository {
                state: state.clone(),
                journal: journal.clone(),
            },
            refresh_tokens: MemRefreshTokenRepository {
                state: state.clone(),
                journal: journal.clone(),
            },
            tasks: MemTaskRepository {
                state: state.clone(),
                journal: journal.clone(),
            },
            state,
            journal,
            finished: false,
        }
    }

    fn undo(&self) {
        let (Ok(mut state), Ok(mut journal)) = (self.state.lock(), self.journal.lock()) else {
            return;
        };
        while let Some(op) = journal.pop() {
            op.apply(&mut state);
        }
    }
}

impl Drop for InMemoryUnitOfWork {
    fn drop(&mut self) {
        if !self.finished {
            self.undo();
        }
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn refresh_tokens(&self) -> &dyn RefreshTokenRepository {
        &self.refresh_tokens
    }

    fn tasks(&self) -> &dyn TaskRepository {
        &self.tasks
    }

    async fn commit(mut self: Box<Self>) -> AppResult<()> {
        lock(&self.journal)?.clear();
        self.finished = true;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> AppResult<()> {
        self.undo();
        self.finished = true;
        Ok(())
    }
}

struct MemUserRepository {
    state: SharedState,
    journal: Journal,
}

#[async_trait]
impl UserRepository for MemUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = lock(&self.state)?;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: &User) -> AppResult<()> {
        let mut state = lock(&self.state)?;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Failed to insert user: duplicate key"));
        }
        state.users.insert(user.id, user.clone());
        lock(&self.journal)?.push(UndoOp::RemoveUser(user.id));
        Ok(())
    }
}

struct MemRefreshTokenRepository {
    state: SharedState,
    journal: Journal,
}

#[async_trait]
impl RefreshTokenRepository for MemRefreshTokenRepository {
    async fn insert(&self, token: &RefreshToken) -> AppResult<()> {
        let mut state = lock(&self.state)?;
        if state
            .refresh_tokens
            .values()
            .any(|t| t.token_hash == token.token_hash)
        {
            return Err(AppError::conflict(
                "Failed to insert refresh token: duplicate key",
            ));
        }
        state.refresh_tokens.insert(token.id, token.clone());
        lock(&self.journal)?.push(UndoOp::RemoveRefreshToken(token.id));
        Ok(())
    }

    async fn revoke_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<RefreshToken>> {
        let mut state = lock(&self.state)?;
        let Some(token) = state
            .refresh_tokens
            .values_mut()
            .find(|t| t.token_hash == token_hash && t.is_active(now))
        else {
            return Ok(None);
        };

        let previous = token.clone();
        token.revoke(now);
        let revoked = token.clone();
        lock(&self.journal)?.push(UndoOp::RestoreRefreshToken(previous));
        Ok(Some(revoked))
    }
}

struct MemTaskRepository {
    state: SharedState,
    journal: Journal,
}

#[async_trait]
impl Repository<TaskItem, TaskId> for MemTaskRepository {
    async fn find_by_id(&self, id: &TaskId) -> AppResult<Option<TaskItem>> {
        Ok(lock(&self.state)?.tasks.get(id).cloned())
    }

    async fn save(&self, task: &TaskItem) -> AppResult<()> {
        let mut state = lock(&self.state)?;
        let undo = match state.tasks.insert(task.id, task.clone()) {
            Some(previous) => UndoOp::RestoreTask(previous),
            None => UndoOp::RemoveTask(task.id),
        };
        lock(&self.journal)?.push(undo);
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> AppResult<bool> {
        let mut state = lock(&self.state)?;
        match state.tasks.remove(id) {
            Some(previous) => {
                lock(&self.journal)?.push(UndoOp::RestoreTask(previous));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TaskRepository for MemTaskRepository {
    async fn list(
        &self,
        filter: &TaskFilter,
        sort: TaskSort,
        pagination: &Pagination,
    ) -> AppResult<(Vec<TaskItem>, u64)> {
        let state = lock(&self.state)?;
        let mut matched: Vec<&TaskItem> =
            state.tasks.values().filter(|t| filter.matches(t)).collect();
        matched.sort_by(|a, b| sort.compare(a, b));

        let total = matched.len() as u64;
        let page = matched
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.page_size as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn count_by_status(&self) -> AppResult<TaskCounts> {
        let state = lock(&self.state)?;
        let mut counts = TaskCounts::default();
        for task in state.tasks.values() {
            counts.add(task.status, 1);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HashedPassword, Priority};
    use chrono::Duration;

    fn token(user_id: UserId, hash: &str) -> RefreshToken {
        let now = Utc::now();
        RefreshToken::issue(user_id, hash.to_string(), now, now + Duration::days(1))
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_undone_on_drop() {
        let store = InMemoryStore::new();
        {
            let uow = store.begin().await.unwrap();
            let task = TaskItem::create("draft", None, Priority::Low, None);
            uow.tasks().save(&task).await.unwrap();
            assert_eq!(store.tasks().len(), 1);
        }
        assert!(store.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_commit_keeps_writes() {
        let store = InMemoryStore::new();
        let uow = store.begin().await.unwrap();
        let user = User::new("a@example.com", HashedPassword::from_hash("x"));
        uow.users().insert(&user).await.unwrap();
        uow.commit().await.unwrap();

        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn test_rollback_restores_revoked_token() {
        let store = InMemoryStore::new();
        let user_id = UserId::new();

        let uow = store.begin().await.unwrap();
        uow.refresh_tokens().insert(&token(user_id, "h1")).await.unwrap();
        uow.commit().await.unwrap();

        let uow = store.begin().await.unwrap();
        let now = Utc::now();
        assert!(uow.refresh_tokens().revoke_active("h1", now).await.unwrap().is_some());
        uow.rollback().await.unwrap();

        // 回滚后令牌恢复为有效
        let uow = store.begin().await.unwrap();
        assert!(
            uow.refresh_tokens()
                .revoke_active("h1", Utc::now())
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_revoke_active_is_single_use() {
        let store = InMemoryStore::new();
        let uow = store.begin().await.unwrap();
        uow.refresh_tokens().insert(&token(UserId::new(), "h2")).await.unwrap();

        let now = Utc::now();
        assert!(uow.refresh_tokens().revoke_active("h2", now).await.unwrap().is_some());
        assert!(uow.refresh_tokens().revoke_active("h2", now).await.unwrap().is_none());
        assert!(uow.refresh_tokens().revoke_active("missing", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryStore::new();
        let uow = store.begin().await.unwrap();
        uow.users()
            .insert(&User::new("a@example.com", HashedPassword::from_hash("x")))
            .await
            .unwrap();

        let err = uow
            .users()
            .insert(&User::new("A@Example.com", HashedPassword::from_hash("y")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
