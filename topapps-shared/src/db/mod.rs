/// Database layer
///
/// - `pool`: the process-wide PostgreSQL connection pool
/// - `migrations`: embedded schema migrations
///
/// Read models and listing queries live in `models` and `apps` at the crate root.

pub mod migrations;
pub mod pool;
