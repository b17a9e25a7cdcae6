//! 阶段管道
//!
//! 每个阶段接收请求与 `next`，可以短路或继续调用下一阶段；
//! 管道末端是本次分发创建的处理器实例。

use std::sync::Arc;

use async_trait::async_trait;
use tasker_errors::AppResult;

use crate::{
    Command, CommandHandler, LoggingStage, Query, QueryHandler, ValidationStage, Validator,
};

/// 管道阶段
#[async_trait]
pub trait PipelineStage<R, O>: Send + Sync {
    async fn handle(&self, request: R, next: Next<'_, R, O>) -> AppResult<O>;
}

/// 管道终端（处理器）
#[async_trait]
pub trait Terminal<R, O>: Send + Sync {
    async fn invoke(&self, request: R) -> AppResult<O>;
}

/// 剩余的管道
pub struct Next<'a, R, O> {
    stages: &'a [Arc<dyn PipelineStage<R, O>>],
    handler: &'a dyn Terminal<R, O>,
}

impl<'a, R, O> Next<'a, R, O>
where
    R: Send + 'static,
    O: Send + 'static,
{
    pub fn new(stages: &'a [Arc<dyn PipelineStage<R, O>>], handler: &'a dyn Terminal<R, O>) -> Self {
        Self { stages, handler }
    }

    /// 执行下一阶段；没有剩余阶段时调用处理器
    pub async fn run(self, request: R) -> AppResult<O> {
        match self.stages.split_first() {
            Some((stage, rest)) => {
                stage
                    .handle(
                        request,
                        Next {
                            stages: rest,
                            handler: self.handler,
                        },
                    )
                    .await
            }
            None => self.handler.invoke(request).await,
        }
    }
}

pub(crate) struct CommandTerminal<H>(pub(crate) H);

#[async_trait]
impl<C, H> Terminal<C, C::Result> for CommandTerminal<H>
where
    C: Command,
    H: CommandHandler<C>,
{
    async fn invoke(&self, request: C) -> AppResult<C::Result> {
        self.0.handle(request).await
    }
}

pub(crate) struct QueryTerminal<H>(pub(crate) H);

#[async_trait]
impl<Q, H> Terminal<Q, Q::Result> for QueryTerminal<H>
where
    Q: Query,
    H: QueryHandler<Q>,
{
    async fn invoke(&self, request: Q) -> AppResult<Q::Result> {
        self.0.handle(request).await
    }
}

/// 每次分发创建一个新的处理器实例
pub(crate) type TerminalFactory<R, O> = Arc<dyn Fn() -> Box<dyn Terminal<R, O>> + Send + Sync>;

/// 某一请求类型的完整管道：日志 → 校验 → 处理器
pub(crate) struct Pipeline<R, O> {
    stages: Vec<Arc<dyn PipelineStage<R, O>>>,
    terminal: TerminalFactory<R, O>,
}

impl<R, O> Pipeline<R, O>
where
    R: Send + Sync + 'static,
    O: Send + 'static,
{
    pub(crate) fn new(
        kind: &'static str,
        validators: Vec<Arc<dyn Validator<R>>>,
        terminal: TerminalFactory<R, O>,
    ) -> Self {
        let stages: Vec<Arc<dyn PipelineStage<R, O>>> = vec![
            Arc::new(LoggingStage::new(kind)),
            Arc::new(ValidationStage::new(validators)),
        ];
        Self { stages, terminal }
    }

    pub(crate) async fn run(&self, request: R) -> AppResult<O> {
        let handler = (self.terminal)();
        Next::new(&self.stages, handler.as_ref()).run(request).await
    }
}
