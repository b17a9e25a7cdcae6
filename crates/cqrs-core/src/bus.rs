//! Command/Query Bus

use async_trait::async_trait;
use tasker_errors::AppResult;

use crate::{Command, Query};

/// Command Bus trait
#[async_trait]
pub trait CommandBus: Send + Sync {
    async fn dispatch<C: Command>(&self, command: C) -> AppResult<C::Result>;
}

/// Query Bus trait
#[async_trait]
pub trait QueryBus: Send + Sync {
    async fn dispatch<Q: Query>(&self, query: Q) -> AppResult<Q::Result>;
}
