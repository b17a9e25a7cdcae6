//! 仓储抽象

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tasker_common::{Pagination, TaskId};
use tasker_errors::AppResult;
use tasker_ports::Repository;

use super::refresh_token::RefreshToken;
use super::task::{Priority, TaskItem, TaskStatus};
use super::user::User;

/// 用户仓储
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 按规范化邮箱查找
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// 插入新用户；邮箱重复返回 `Conflict`
    async fn insert(&self, user: &User) -> AppResult<()>;
}

/// 刷新令牌仓储
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(&self, token: &RefreshToken) -> AppResult<()>;

    /// 原子地吊销匹配的有效记录，返回被吊销的记录
    ///
    /// 同一哈希的并发调用最多只有一个得到 `Some`。
    async fn revoke_active(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<RefreshToken>>;
}

/// 任务过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// 在标题与描述中做子串匹配
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &TaskItem) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        match self.search.as_deref() {
            Some(term) => {
                task.title.contains(term)
                    || task.description.as_deref().is_some_and(|d| d.contains(term))
            }
            None => true,
        }
    }
}

/// 排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortField {
    Title,
    Priority,
    Status,
    DueDate,
    CreatedAt,
}

/// 排序方式，默认按创建时间倒序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub field: TaskSortField,
    pub descending: bool,
}

impl Default for TaskSort {
    fn default() -> Self {
        Self {
            field: TaskSortField::CreatedAt,
            descending: true,
        }
    }
}

impl TaskSort {
    /// 解析排序键（不区分大小写），未知或空值回退到默认排序
    pub fn parse(key: Option<&str>) -> Self {
        let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) else {
            return Self::default();
        };

        let key = key.to_lowercase();
        let (name, descending) = match key.strip_suffix("_desc") {
            Some(name) => (name, true),
            None => (key.as_str(), false),
        };
        let field = match name {
            "title" => TaskSortField::Title,
            "priority" => TaskSortField::Priority,
            "status" => TaskSortField::Status,
            "duedate" => TaskSortField::DueDate,
            "created" => TaskSortField::CreatedAt,
            _ => return Self::default(),
        };
        Self { field, descending }
    }

    /// SQL ORDER BY 子句（字段名为白名单常量）
    pub fn order_by_sql(&self) -> &'static str {
        match (self.field, self.descending) {
            (TaskSortField::Title, false) => "title ASC, id ASC",
            (TaskSortField::Title, true) => "title DESC, id DESC",
            (TaskSortField::Priority, false) => "priority ASC, id ASC",
            (TaskSortField::Priority, true) => "priority DESC, id DESC",
            (TaskSortField::Status, false) => "status ASC, id ASC",
            (TaskSortField::Status, true) => "status DESC, id DESC",
            (TaskSortField::DueDate, false) => "due_date ASC NULLS FIRST, id ASC",
            (TaskSortField::DueDate, true) => "due_date DESC NULLS LAST, id DESC",
            (TaskSortField::CreatedAt, false) => "created_at ASC, id ASC",
            (TaskSortField::CreatedAt, true) => "created_at DESC, id DESC",
        }
    }

    /// 内存排序比较
    pub fn compare(&self, a: &TaskItem, b: &TaskItem) -> std::cmp::Ordering {
        let ordering = match self.field {
            TaskSortField::Title => a.title.cmp(&b.title),
            TaskSortField::Priority => a.priority.cmp(&b.priority),
            TaskSortField::Status => a.status.cmp(&b.status),
            TaskSortField::DueDate => a.due_date.cmp(&b.due_date),
            TaskSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
        .then_with(|| a.id.cmp(&b.id));

        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// 按状态统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub archived: u64,
}

impl TaskCounts {
    pub fn add(&mut self, status: TaskStatus, count: u64) {
        match status {
            TaskStatus::Pending => self.pending += count,
            TaskStatus::InProgress => self.in_progress += count,
            TaskStatus::Completed => self.completed += count,
            TaskStatus::Archived => self.archived += count,
        }
    }

    pub fn total(&self) -> u64 {
        self.pending + self.in_progress + self.completed + self.archived
    }
}

/// 任务仓储
#[async_trait]
pub trait TaskRepository: Repository<TaskItem, TaskId> {
    /// 过滤、排序并分页，返回当前页与总数
    async fn list(
        &self,
        filter: &TaskFilter,
        sort: TaskSort,
        pagination: &Pagination,
    ) -> AppResult<(Vec<TaskItem>, u64)>;

    async fn count_by_status(&self) -> AppResult<TaskCounts>;
}
