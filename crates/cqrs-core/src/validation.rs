//! 校验阶段

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tasker_errors::{AppError, AppResult, FieldError, ValidationErrors};

use crate::{Next, PipelineStage};

/// 请求校验器（无状态）
#[async_trait]
pub trait Validator<R>: Send + Sync {
    async fn validate(&self, request: &R) -> Vec<FieldError>;
}

/// 并发执行某请求类型的全部校验器，合并失败项
///
/// 任何失败都会短路，处理器不会被调用。
pub struct ValidationStage<R> {
    validators: Vec<Arc<dyn Validator<R>>>,
}

impl<R> ValidationStage<R>
where
    R: Send + Sync + 'static,
{
    pub fn new(validators: Vec<Arc<dyn Validator<R>>>) -> Self {
        Self { validators }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// 运行全部校验器并合并结果
    pub async fn validate(&self, request: &R) -> ValidationErrors {
        join_all(self.validators.iter().map(|v| v.validate(request)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}

#[async_trait]
impl<R, O> PipelineStage<R, O> for ValidationStage<R>
where
    R: Send + Sync + 'static,
    O: Send + 'static,
{
    async fn handle(&self, request: R, next: Next<'_, R, O>) -> AppResult<O> {
        if self.validators.is_empty() {
            return next.run(request).await;
        }

        let errors = self.validate(&request).await;
        if !errors.is_empty() {
            tracing::debug!(
                request = std::any::type_name::<R>(),
                failures = errors.len(),
                "Validation failed"
            );
            return Err(AppError::validation_failed(errors));
        }

        next.run(request).await
    }
}
