//! Tasker Service Library
//!
//! 分层结构：
//! - `domain`: 实体、领域事件、仓储与 Unit of Work 抽象
//! - `application`: 命令/查询、处理器、校验器、事件监听器与注册表组装
//! - `infrastructure`: PostgreSQL / 内存持久化、审计、推送与业务指标

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::registry::{ServiceDeps, build_dispatcher, build_registry};
pub use error::AuthFailure;
