//! 查询定义

use tasker_common::{PagedResult, TaskId};
use tasker_cqrs_core::Query;

use crate::application::dto::{TaskDto, TaskListItem, TaskStatsDto};
use crate::domain::{Priority, TaskStatus};

/// 按 ID 获取任务
#[derive(Debug, Clone)]
pub struct GetTaskItemByIdQuery {
    pub id: TaskId,
}

impl Query for GetTaskItemByIdQuery {
    type Result = Option<TaskDto>;
}

/// 分页查询任务
#[derive(Debug, Clone)]
pub struct GetTaskItemsPagedQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
    pub page: u32,
    pub page_size: u32,
    /// 排序键，例如 `title`、`priority_desc`
    pub sort: Option<String>,
}

impl Default for GetTaskItemsPagedQuery {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            search: None,
            page: 1,
            page_size: 10,
            sort: None,
        }
    }
}

impl Query for GetTaskItemsPagedQuery {
    type Result = PagedResult<TaskListItem>;
}

/// 任务统计
#[derive(Debug, Clone, Copy, Default)]
pub struct GetTaskItemStatsQuery;

impl Query for GetTaskItemStatsQuery {
    type Result = TaskStatsDto;
}
