//! Fallback composition of two classifiers.
//!
//! Tries the primary; on any error invokes the fallback and notes the
//! failover in the result's reasoning. Keeps the fallback policy testable
//! in isolation from either implementation.

use leadflow_types::classify::StatusDetectionResult;
use leadflow_types::error::ClassificationError;

use super::classifier::{ClassificationInput, Classifier};

/// Decorator that falls back to a secondary classifier on primary failure.
pub struct FallbackClassifier<P, F> {
    primary: P,
    fallback: F,
    name: String,
}

impl<P: Classifier, F: Classifier> FallbackClassifier<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        let name = format!("{}->{}", primary.name(), fallback.name());
        Self {
            primary,
            fallback,
            name,
        }
    }
}

impl<P: Classifier, F: Classifier> Classifier for FallbackClassifier<P, F> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(
        &self,
        input: &ClassificationInput<'_>,
    ) -> Result<StatusDetectionResult, ClassificationError> {
        let error = match self.primary.classify(input).await {
            Ok(result) => return Ok(result),
            Err(error) => error,
        };

        tracing::warn!(
            contact = %input.contact_ref,
            primary = %self.primary.name(),
            %error,
            "primary classifier failed, falling back"
        );

        let mut result = self.fallback.classify(input).await?;
        let note = format!("fallback from {} after error: {error}", self.primary.name());
        result.reasoning = Some(match result.reasoning.take() {
            Some(reasoning) => format!("{reasoning} ({note})"),
            None => note,
        });
        Ok(result)
    }
}
