//! Business logic for Leadflow: parsers, classifiers, the import pipeline,
//! and the session persistence service.
//!
//! This crate defines the trait seams (`ChatExtractor`, `ClientRepository`,
//! `SessionArtifactRepository`, `LlmProvider`) whose concrete implementations
//! live in `leadflow-infra`.

pub mod cache;
pub mod classify;
pub mod extract;
pub mod import;
pub mod llm;
pub mod parse;
pub mod repository;
pub mod retry;
pub mod session;
