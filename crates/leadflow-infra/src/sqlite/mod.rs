//! SQLite persistence via sqlx.

pub mod client;
pub mod pool;
pub mod session;
