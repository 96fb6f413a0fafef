//! LlmProvider trait definition.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).
//! Implementations live in leadflow-infra (e.g., `AnthropicProvider`).

use leadflow_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM completion backends.
///
/// Classification needs only non-streaming completions; one call per
/// contact, bounded by the configured prompt caps.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}

impl<T: LlmProvider> LlmProvider for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        (**self).complete(request).await
    }
}
