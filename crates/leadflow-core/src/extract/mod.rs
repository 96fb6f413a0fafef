//! ChatExtractor trait definition.
//!
//! The raw chat-extraction client is an external collaborator; the pipeline
//! consumes it through this seam only. Implementations live in
//! leadflow-infra (e.g., `JsonFileExtractor`) and in tests (mocks).

use leadflow_types::error::ExtractionError;
use leadflow_types::extract::{ExtractedContact, ExtractedMessage};

/// Trait for the external chat-extraction client.
pub trait ChatExtractor: Send + Sync {
    /// List contacts with chat history, optionally truncated to `limit`.
    fn extract_contacts(
        &self,
        limit: Option<usize>,
    ) -> impl std::future::Future<Output = Result<Vec<ExtractedContact>, ExtractionError>> + Send;

    /// Fetch one contact's messages, ordered by timestamp ascending.
    fn extract_messages(
        &self,
        phone: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ExtractedMessage>, ExtractionError>> + Send;
}
