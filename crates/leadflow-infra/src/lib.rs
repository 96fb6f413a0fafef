//! Infrastructure implementations for Leadflow.
//!
//! Concrete backends for the trait seams defined in `leadflow-core`:
//! SQLite repositories via sqlx, the Anthropic LLM provider over reqwest,
//! the JSON-file chat extractor, the staging directory resource, and the
//! TOML config loader.

pub mod config;
pub mod extract;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
