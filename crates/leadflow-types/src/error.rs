//! Error taxonomy for the import pipeline and session store.
//!
//! Per-contact errors (`ExtractionError`, `ClassificationError`,
//! `RepositoryError`, validation failures) never abort a run; only
//! `ImportError` variants raised outside the per-contact loop do.

use thiserror::Error;

/// Errors from repository operations (used by trait definitions in leadflow-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from session artifact storage and the staging protocol.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// No artifact (or a cleared one) exists for the organization. Fatal to
    /// restoration; the caller must fall back to a fresh interactive login.
    #[error("no session artifact for organization")]
    NotFound,

    #[error("staging I/O error: {0}")]
    Staging(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from status classification.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("llm error: {0}")]
    Llm(String),

    #[error("llm detector not configured")]
    NotConfigured,

    #[error("invalid status in llm response: '{0}'")]
    InvalidStatus(String),

    #[error("unparseable llm response")]
    UnparseableResponse,
}

/// Errors from the external chat-extraction client.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extractor unavailable: {0}")]
    Unavailable(String),

    #[error("failed to extract contacts: {0}")]
    Contacts(String),

    #[error("failed to extract messages for {contact_ref}: {message}")]
    Messages {
        contact_ref: String,
        message: String,
    },
}

/// Top-level import run errors. Raised only outside the per-contact loop;
/// these flip the run to `Failed`.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
