//! 持久化实现

mod memory;
mod postgres_unit_of_work;
mod rows;
mod tx_repositories;

pub use memory::InMemoryStore;
pub use postgres_unit_of_work::PostgresUnitOfWorkFactory;
