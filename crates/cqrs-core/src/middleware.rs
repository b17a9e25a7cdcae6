//! 日志阶段

use async_trait::async_trait;
use tasker_errors::{AppError, AppResult};

use crate::{Next, PipelineStage};

/// 日志中间件
pub struct LoggingStage {
    kind: &'static str,
}

impl LoggingStage {
    pub fn new(kind: &'static str) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl<R, O> PipelineStage<R, O> for LoggingStage
where
    R: Send + 'static,
    O: Send + 'static,
{
    async fn handle(&self, request: R, next: Next<'_, R, O>) -> AppResult<O> {
        let name = std::any::type_name::<R>();
        tracing::debug!(kind = self.kind, request = name, "Executing {}", self.kind);

        let result = next.run(request).await;
        match &result {
            Ok(_) => tracing::debug!(kind = self.kind, request = name, "{} executed successfully", self.kind),
            Err(AppError::ValidationFailed(errors)) => {
                tracing::info!(kind = self.kind, request = name, errors = %errors, "{} rejected by validation", self.kind)
            }
            Err(e) => tracing::error!(kind = self.kind, request = name, error = %e, "{} failed", self.kind),
        }
        result
    }
}
