//! 命令与查询处理器
//!
//! 每次分发都由注册表工厂构造一个新的处理器实例，处理器内部开启自己的 Unit of Work。

mod create_task_handler;
mod delete_task_handler;
mod login_handler;
mod logout_handler;
mod refresh_token_handler;
mod register_handler;
mod task_query_handlers;
mod token_issuer;
mod update_task_handler;

pub use create_task_handler::CreateTaskItemHandler;
pub use delete_task_handler::DeleteTaskItemHandler;
pub use login_handler::LoginHandler;
pub use logout_handler::LogoutHandler;
pub use refresh_token_handler::RefreshTokenHandler;
pub use register_handler::RegisterHandler;
pub use task_query_handlers::{
    GetTaskItemByIdHandler, GetTaskItemStatsHandler, GetTaskItemsPagedHandler,
};
pub use update_task_handler::UpdateTaskItemHandler;
