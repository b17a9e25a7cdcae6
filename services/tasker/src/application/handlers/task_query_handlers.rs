//! 任务查询处理器
//!
//! 查询只读，Unit of Work 不提交，随处理器结束丢弃。

use std::sync::Arc;

use async_trait::async_trait;
use tasker_common::{PagedResult, Pagination};
use tasker_cqrs_core::QueryHandler;
use tasker_errors::AppResult;

use crate::application::dto::{TaskDto, TaskListItem, TaskStatsDto};
use crate::application::queries::{
    GetTaskItemByIdQuery, GetTaskItemStatsQuery, GetTaskItemsPagedQuery,
};
use crate::domain::UnitOfWorkFactory;
use crate::domain::repositories::{TaskFilter, TaskSort};

pub struct GetTaskItemByIdHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl GetTaskItemByIdHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }
}

#[async_trait]
impl QueryHandler<GetTaskItemByIdQuery> for GetTaskItemByIdHandler {
    async fn handle(&self, query: GetTaskItemByIdQuery) -> AppResult<Option<TaskDto>> {
        let uow = self.uow_factory.begin().await?;
        let task = uow.tasks().find_by_id(&query.id).await?;
        Ok(task.as_ref().map(TaskDto::from))
    }
}

pub struct GetTaskItemsPagedHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl GetTaskItemsPagedHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }
}

#[async_trait]
impl QueryHandler<GetTaskItemsPagedQuery> for GetTaskItemsPagedHandler {
    async fn handle(&self, query: GetTaskItemsPagedQuery) -> AppResult<PagedResult<TaskListItem>> {
        let filter = TaskFilter {
            status: query.status,
            priority: query.priority,
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        };
        let sort = TaskSort::parse(query.sort.as_deref());
        let pagination = Pagination::new(query.page, query.page_size);

        let uow = self.uow_factory.begin().await?;
        let (tasks, total) = uow.tasks().list(&filter, sort, &pagination).await?;

        Ok(PagedResult::new(
            tasks.into_iter().map(TaskListItem::from).collect(),
            total,
            &pagination,
        ))
    }
}

pub struct GetTaskItemStatsHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl GetTaskItemStatsHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { uow_factory }
    }
}

#[async_trait]
impl QueryHandler<GetTaskItemStatsQuery> for GetTaskItemStatsHandler {
    async fn handle(&self, _query: GetTaskItemStatsQuery) -> AppResult<TaskStatsDto> {
        let uow = self.uow_factory.begin().await?;
        let counts = uow.tasks().count_by_status().await?;
        Ok(TaskStatsDto::from(counts))
    }
}
