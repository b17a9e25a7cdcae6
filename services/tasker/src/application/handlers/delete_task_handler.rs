//! 删除任务处理器

use std::sync::Arc;

use async_trait::async_trait;
use tasker_cqrs_core::CommandHandler;
use tasker_errors::{AppError, AppResult};
use tasker_ports::PushChannel;
use tracing::info;

use crate::application::commands::DeleteTaskItemCommand;
use crate::application::listeners::{TaskNotification, notify};
use crate::domain::UnitOfWorkFactory;

pub struct DeleteTaskItemHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    push: Arc<dyn PushChannel>,
}

impl DeleteTaskItemHandler {
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, push: Arc<dyn PushChannel>) -> Self {
        Self { uow_factory, push }
    }
}

#[async_trait]
impl CommandHandler<DeleteTaskItemCommand> for DeleteTaskItemHandler {
    async fn handle(&self, command: DeleteTaskItemCommand) -> AppResult<()> {
        let uow = self.uow_factory.begin().await?;
        if !uow.tasks().delete(&command.id).await? {
            return Err(AppError::not_found(format!("Task {} not found", command.id)));
        }
        uow.commit().await?;
        info!(task_id = %command.id, "Task deleted");

        notify(
            self.push.as_ref(),
            TaskNotification::Deleted {
                task_id: command.id,
            },
        )
        .await?;
        Ok(())
    }
}
