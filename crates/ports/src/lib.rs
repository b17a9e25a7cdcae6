//! ports - 抽象 trait 层
//!
//! 定义审计、推送与持久化的抽象接口

mod audit;
mod push_channel;
mod repository;

pub use audit::*;
pub use push_channel::*;
pub use repository::*;
