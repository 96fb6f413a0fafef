//! Classifier trait definition.
//!
//! A `Classifier` turns a contact's conversation into a
//! [`StatusDetectionResult`]. Uses native async fn in traits (RPITIT,
//! Rust 2024 edition), same pattern as the repository traits.

use chrono::{DateTime, Utc};

use leadflow_types::classify::StatusDetectionResult;
use leadflow_types::client::ParsedMessage;
use leadflow_types::error::ClassificationError;

/// Everything a classifier may look at for one contact.
///
/// Borrows from the caller; classification never mutates the conversation.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationInput<'a> {
    /// Human-readable contact reference (name or phone), used in prompts
    /// and log lines.
    pub contact_ref: &'a str,
    /// Conversation ordered by timestamp ascending.
    pub messages: &'a [ParsedMessage],
    pub first_message_date: DateTime<Utc>,
    pub last_message_date: DateTime<Utc>,
    /// Detected primary language of the conversation.
    pub language: &'a str,
}

/// Capability trait for status detectors.
///
/// Implementations: [`super::HeuristicClassifier`] (deterministic),
/// [`super::LlmClassifier`] (probabilistic), and
/// [`super::FallbackClassifier`] composing the two.
pub trait Classifier: Send + Sync {
    /// Short name used in fallback reasoning and log lines.
    fn name(&self) -> &str;

    /// Classify one contact's conversation.
    fn classify(
        &self,
        input: &ClassificationInput<'_>,
    ) -> impl std::future::Future<Output = Result<StatusDetectionResult, ClassificationError>> + Send;
}

impl<T: Classifier> Classifier for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn classify(
        &self,
        input: &ClassificationInput<'_>,
    ) -> Result<StatusDetectionResult, ClassificationError> {
        (**self).classify(input).await
    }
}
