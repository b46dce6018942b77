/// API route handlers
///
/// - `health`: Health check endpoint
/// - `apps`: Dashboard listings and per-app stats

pub mod apps;
pub mod health;
