//! Database pool, schema migrations, and the status store gateway.

pub mod db;
pub mod migrations;

pub use db::{create_pool, get_connection, DbConnection, DbPool, LockStatus, StatusRow};
