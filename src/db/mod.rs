//! Storage: the connection pool and database preparation.

mod migrate;
mod pool;

pub use migrate::{
    MIGRATIONS, PrepareReport, pending_migrations_blocking, prepare_database,
    prepare_database_blocking,
};
pub use pool::{AsyncDbPool, establish_async_connection_pool};
