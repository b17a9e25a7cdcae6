//! 应用层

pub mod commands;
pub mod dto;
pub mod handlers;
pub mod listeners;
pub mod queries;
pub mod registry;
pub mod validators;
