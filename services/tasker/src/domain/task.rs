//! 任务实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasker_common::TaskId;
use tasker_errors::AppError;

/// 任务优先级（Low < Medium < High）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_i16(self) -> i16 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn from_i16(value: i16) -> Result<Self, AppError> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            other => Err(AppError::database(format!("Unknown priority value {}", other))),
        }
    }

    pub fn is_high(self) -> bool {
        self == Self::High
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 任务状态（按流转顺序排序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Archived,
}

impl TaskStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            Self::Pending => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
            Self::Archived => 3,
        }
    }

    pub fn from_i16(value: i16) -> Result<Self, AppError> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Archived),
            other => Err(AppError::database(format!("Unknown status value {}", other))),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskItem {
    /// 创建新任务，初始状态为 `Pending`
    pub fn create(
        title: impl Into<String>,
        description: Option<String>,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            title: title.into(),
            description,
            priority,
            status: TaskStatus::Pending,
            due_date,
            created_at: now,
            updated_at: Some(now),
        }
    }

    /// 更新任务字段，返回更新前的优先级
    pub fn update(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        priority: Priority,
        status: TaskStatus,
        due_date: Option<DateTime<Utc>>,
    ) -> Priority {
        let previous = self.priority;
        self.title = title.into();
        self.description = description;
        self.priority = priority;
        self.status = status;
        self.due_date = due_date;
        self.updated_at = Some(Utc::now());
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_starts_pending() {
        let task = TaskItem::create("Write report", None, Priority::Medium, None);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.updated_at, Some(task.created_at));
    }

    #[test]
    fn test_update_returns_previous_priority() {
        let mut task = TaskItem::create("Write report", None, Priority::Low, None);
        let previous = task.update(
            "Write report v2",
            Some("details".to_string()),
            Priority::High,
            TaskStatus::InProgress,
            None,
        );

        assert_eq!(previous, Priority::Low);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert!(task.updated_at.unwrap() >= task.created_at);
    }

    #[test]
    fn test_ordinal_roundtrip() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::from_i16(priority.as_i16()).unwrap(), priority);
        }
        assert!(TaskStatus::from_i16(9).is_err());
        assert!(Priority::Low < Priority::High);
    }
}
