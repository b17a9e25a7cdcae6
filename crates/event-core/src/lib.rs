//! tasker-event-core - 事件核心库
//!
//! DomainEvent trait、Event Handler、顺序事件中继

mod domain_event;
mod event_handler;

pub use domain_event::*;
pub use event_handler::*;
