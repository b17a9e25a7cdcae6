//! 创建任务处理器

use std::sync::Arc;

use async_trait::async_trait;
use tasker_cqrs_core::CommandHandler;
use tasker_errors::AppResult;
use tasker_event_core::EventRelay;
use tasker_ports::PushChannel;
use tracing::info;

use crate::application::commands::CreateTaskItemCommand;
use crate::application::dto::TaskDto;
use crate::application::listeners::{TaskNotification, notify};
use crate::domain::{HighPriorityTaskChanged, TaskItem, UnitOfWorkFactory};

pub struct CreateTaskItemHandler {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    push: Arc<dyn PushChannel>,
    relay: Arc<EventRelay<HighPriorityTaskChanged>>,
}

impl CreateTaskItemHandler {
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
impl CommandHandler<CreateTaskItemCommand> for CreateTaskItemHandler {
    async fn handle(&self, command: CreateTaskItemCommand) -> AppResult<TaskDto> {
        let task = TaskItem::create(
            command.title,
            command.description,
            command.priority,
            command.due_date,
        );

        let uow = self.uow_factory.begin().await?;
        uow.tasks().save(&task).await?;
        uow.commit().await?;
        info!(task_id = %task.id, priority = %task.priority, "Task created");

        notify(
            self.push.as_ref(),
            TaskNotification::Created {
                task_id: task.id,
                title: &task.title,
            },
        )
        .await?;

        if task.priority.is_high() {
            let event = HighPriorityTaskChanged::new(&task, HighPriorityTaskChanged::CREATED);
            self.relay.publish(&event).await?;
        }

        Ok(TaskDto::from(&task))
    }
}
