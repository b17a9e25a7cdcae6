//! tasker-cqrs-core - CQRS 核心库
//!
//! Command/Query trait、处理器注册表、阶段管道、校验阶段与分发器

mod bus;
mod command;
mod dispatcher;
mod middleware;
mod pipeline;
mod query;
mod registry;
mod validation;

pub use bus::*;
pub use command::*;
pub use dispatcher::*;
pub use middleware::*;
pub use pipeline::{Next, PipelineStage, Terminal};
pub use query::*;
pub use registry::*;
pub use validation::*;
