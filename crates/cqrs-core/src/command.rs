//! Command trait 定义

use async_trait::async_trait;
use tasker_errors::AppResult;

/// Command trait
///
/// 无返回值的命令使用 `type Result = ();`
pub trait Command: Send + Sync + 'static {
    type Result: Send + 'static;
}

/// Command Handler trait
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, command: C) -> AppResult<C::Result>;
}
