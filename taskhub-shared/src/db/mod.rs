/// Database layer for TaskHub
///
/// # Modules
///
/// - `pool`: The [`pool::Database`] context and its connection pool
/// - `migrations`: Schema synchronization run at startup
///
/// Models are in the `models` module at crate root level.

pub mod migrations;
pub mod pool;

pub use pool::{Database, DatabaseConfig};
