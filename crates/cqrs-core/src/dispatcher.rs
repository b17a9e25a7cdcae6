//! 分发器
//!
//! 按请求的具体类型找到管道并执行；不含任何业务逻辑。

use std::sync::Arc;

use async_trait::async_trait;
use tasker_errors::AppResult;

use crate::{Command, CommandBus, HandlerRegistry, Query, QueryBus};

/// 请求分发器
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// 分发命令
    pub async fn send<C: Command>(&self, command: C) -> AppResult<C::Result> {
        let pipeline = self.registry.pipeline::<C, C::Result>()?;
        pipeline.run(command).await
    }

    /// 分发查询
    pub async fn query<Q: Query>(&self, query: Q) -> AppResult<Q::Result> {
        let pipeline = self.registry.pipeline::<Q, Q::Result>()?;
        pipeline.run(query).await
    }
}

#[async_trait]
impl CommandBus for Dispatcher {
    async fn dispatch<C: Command>(&self, command: C) -> AppResult<C::Result> {
        self.send(command).await
    }
}

#[async_trait]
impl QueryBus for Dispatcher {
    async fn dispatch<Q: Query>(&self, query: Q) -> AppResult<Q::Result> {
        self.query(query).await
    }
}
