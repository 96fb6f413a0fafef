//! Strategy façade selecting between the LLM and heuristic classifiers.

use leadflow_types::classify::StatusDetectionResult;
use leadflow_types::error::ClassificationError;

use super::classifier::{ClassificationInput, Classifier};
use super::fallback::FallbackClassifier;
use super::heuristic::HeuristicClassifier;

/// Strategy object for status detection.
///
/// Holds an optional LLM-backed detector plus the configured default mode
/// and fallback policy. Callers may override the mode per invocation.
pub struct StatusClassifier<L: Classifier> {
    llm: Option<L>,
    prefer_llm: bool,
    fallback_on_error: bool,
}

impl StatusClassifier<HeuristicClassifier> {
    /// A classifier with no LLM detector; every call uses the heuristic.
    pub fn heuristic_only() -> Self {
        Self {
            llm: None,
            prefer_llm: false,
            fallback_on_error: true,
        }
    }
}

impl<L: Classifier> StatusClassifier<L> {
    pub fn new(llm: Option<L>, prefer_llm: bool, fallback_on_error: bool) -> Self {
        Self {
            llm,
            prefer_llm,
            fallback_on_error,
        }
    }

    /// Detect the status of one contact's conversation.
    ///
    /// `use_llm` overrides the configured default when provided. When the
    /// effective mode is LLM and a detector is configured, failures either
    /// fall back to the heuristic (with the failover noted in `reasoning`)
    /// or propagate, per the fallback flag.
    pub async fn detect_status(
        &self,
        input: &ClassificationInput<'_>,
        use_llm: Option<bool>,
    ) -> Result<StatusDetectionResult, ClassificationError> {
        let effective_llm = use_llm.unwrap_or(self.prefer_llm);

        match &self.llm {
            Some(llm) if effective_llm => {
                if self.fallback_on_error {
                    FallbackClassifier::new(llm, HeuristicClassifier)
                        .classify(input)
                        .await
                } else {
                    llm.classify(input).await
                }
            }
            _ => HeuristicClassifier.classify(input).await,
        }
    }
}
