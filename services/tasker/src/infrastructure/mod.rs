//! 基础设施层

pub mod audit;
pub mod observability;
pub mod persistence;
pub mod push;
