//! Infrastructure layer implementations.

pub mod database;
pub mod memory;

pub use database::{PostgresClient, PostgresConfig};
pub use memory::InMemoryClient;
