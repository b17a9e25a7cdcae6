//! 更新任务处理器

use std::sync::Arc;

use async_trait::async_trait;
use tasker_cqrs_core::CommandHandler;
use tasker_errors::{AppError, AppResult};
use tasker_event_core::EventRelay;
use tasker_ports::PushChannel;
use tracing::info;

use crate::application::commands::UpdateTaskItemCommand;
use crate::application::listeners::{TaskNotification, notify};
use crate::domain::{HighPriorityTaskChanged, UnitOfWorkFactory};

pub struct UpdateTaskItemHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    push: Arc<dyn PushChannel>,
    relay: Arc<EventRelay<HighPriorityTaskChanged>>,
}

impl UpdateTaskItemHandler {
    pub fn new(
        uow_factory: Arc<dyn UnitOfWorkFactory>,
        push: Arc<dyn PushChannel>,
        relay: Arc<EventRelay<HighPriorityTaskChanged>>,
    ) -> Self {
        Self {
            uow_factory,
            push,
            relay,
        }
    }
}

#[async_trait]
impl CommandHandler<UpdateTaskItemCommand> for UpdateTaskItemHandler {
    async fn handle(&self, command: UpdateTaskItemCommand) -> AppResult<()> {
        let uow = self.uow_factory.begin().await?;
        let Some(mut task) = uow.tasks().find_by_id(&command.id).await? else {
            return Err(AppError::not_found(format!("Task {} not found", command.id)));
        };

        let previous = task.update(
            command.title,
            command.description,
            command.priority,
            command.status,
            command.due_date,
        );
        uow.tasks().save(&task).await?;
        uow.commit().await?;
        info!(task_id = %task.id, "Task updated");

        notify(
            self.push.as_ref(),
            TaskNotification::Updated {
                task_id: task.id,
                title: &task.title,
            },
        )
        .await?;

        if task.priority.is_high() {
            let reason = if previous.is_high() {
                HighPriorityTaskChanged::UPDATED
            } else {
                HighPriorityTaskChanged::ELEVATED
            };
            self.relay
                .publish(&HighPriorityTaskChanged::new(&task, reason))
                .await?;
        }

        Ok(())
    }
}
