//! LLM-backed status classifier.
//!
//! Prompts the model for a strict JSON object `{status, confidence,
//! reasoning}` over a size-capped transcript. The 8-value status enum is
//! enforced; an unparseable response degrades to keyword sniffing over the
//! raw text at low confidence instead of failing the contact.

use serde::Deserialize;

use leadflow_types::classify::StatusDetectionResult;
use leadflow_types::client::SalesStatus;
use leadflow_types::config::ClassifierConfig;
use leadflow_types::error::ClassificationError;
use leadflow_types::llm::{CompletionRequest, Message, MessageRole};

use crate::llm::provider::LlmProvider;

use super::classifier::{ClassificationInput, Classifier};

/// Confidence assigned when the status was sniffed from free text.
const SNIFFED_CONFIDENCE: f64 = 0.4;

/// Confidence assigned when nothing in the response matched.
const DEFAULT_CONFIDENCE: f64 = 0.3;

const SYSTEM_PROMPT: &str = "You are a sales assistant classifying a chat conversation \
between a tour business and a prospective client into a sales-funnel status. \
Valid statuses: new_lead, qualified, warmed, proposal_sent, negotiation, sold, \
service, closed. Respond with ONLY a JSON object: \
{\"status\": \"...\", \"confidence\": 0.0-1.0, \"reasoning\": \"...\"}";

/// Status classifier backed by an LLM provider.
pub struct LlmClassifier<P: LlmProvider> {
    provider: P,
    config: ClassifierConfig,
}

impl<P: LlmProvider> LlmClassifier<P> {
    pub fn new(provider: P, config: ClassifierConfig) -> Self {
        Self { provider, config }
    }

    /// Build the user prompt, truncating oldest content first to honor the
    /// configured size caps. Truncation is marked explicitly in the prompt.
    fn build_prompt(&self, input: &ClassificationInput<'_>) -> String {
        let total = input.messages.len();
        let keep_from = total.saturating_sub(self.config.max_prompt_messages);

        let mut lines: Vec<String> = Vec::with_capacity(total - keep_from);
        for message in &input.messages[keep_from..] {
            let side = if message.from_counterpart() {
                "client"
            } else {
                "operator"
            };
            let mut content = message.content.clone();
            if content.chars().count() > self.config.max_message_chars {
                content = content
                    .chars()
                    .take(self.config.max_message_chars)
                    .collect::<String>();
                content.push_str(" [truncated]");
            }
            lines.push(format!(
                "{} | {side}: {content}",
                message.timestamp.format("%Y-%m-%d %H:%M")
            ));
        }

        let header_budget = 400;
        let transcript_budget = self.config.max_prompt_chars.saturating_sub(header_budget);
        let mut omitted = keep_from;
        let mut transcript_len: usize = lines.iter().map(|l| l.chars().count() + 1).sum();
        let mut start = 0;
        while transcript_len > transcript_budget && start < lines.len() {
            transcript_len -= lines[start].chars().count() + 1;
            start += 1;
            omitted += 1;
        }

        let mut prompt = format!(
            "Contact: {}\nLanguage: {}\nFirst message: {}\nLast message: {}\n",
            input.contact_ref,
            input.language,
            input.first_message_date.format("%Y-%m-%d"),
            input.last_message_date.format("%Y-%m-%d"),
        );
        if omitted > 0 {
            prompt.push_str(&format!("[transcript truncated: {omitted} older messages omitted]\n"));
        }
        prompt.push_str("Transcript:\n");
        prompt.push_str(&lines[start..].join("\n"));
        prompt
    }

    /// Parse the model response, enforcing the status enum; degrade to
    /// keyword sniffing when the JSON contract is not met.
    fn parse_response(content: &str) -> StatusDetectionResult {
        if let Some(parsed) = extract_json_payload(content) {
            if let Ok(status) = parsed.status.parse::<SalesStatus>() {
                let mut result = StatusDetectionResult::new(status, parsed.confidence);
                result.reasoning = parsed.reasoning;
                return result;
            }
            tracing::warn!(status = %parsed.status, "LLM returned a status outside the enum, sniffing raw text");
        }

        sniff_status(content)
    }
}

#[derive(Debug, Deserialize)]
struct LlmStatusPayload {
    status: String,
    #[serde(default = "default_payload_confidence")]
    confidence: f64,
    reasoning: Option<String>,
}

fn default_payload_confidence() -> f64 {
    0.5
}

/// Pull the outermost JSON object out of the response text, tolerating
/// surrounding prose or code fences.
fn extract_json_payload(content: &str) -> Option<LlmStatusPayload> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&content[start..=end]).ok()
}

/// Keyword sniffing over the raw response, most specific statuses first.
fn sniff_status(content: &str) -> StatusDetectionResult {
    let lower = content.to_lowercase();
    let candidates: [(SalesStatus, &[&str]); 8] = [
        (SalesStatus::ProposalSent, &["proposal_sent", "proposal sent"]),
        (SalesStatus::Negotiation, &["negotiation"]),
        (SalesStatus::NewLead, &["new_lead", "new lead"]),
        (SalesStatus::Sold, &["sold"]),
        (SalesStatus::Service, &["service"]),
        (SalesStatus::Closed, &["closed"]),
        (SalesStatus::Warmed, &["warmed"]),
        (SalesStatus::Qualified, &["qualified"]),
    ];

    for (status, needles) in candidates {
        if needles.iter().any(|n| lower.contains(n)) {
            return StatusDetectionResult::new(status, SNIFFED_CONFIDENCE)
                .with_reasoning("status sniffed from unstructured response");
        }
    }

    StatusDetectionResult::new(SalesStatus::NewLead, DEFAULT_CONFIDENCE)
        .with_reasoning("unparseable response, defaulted")
}

impl<P: LlmProvider> Classifier for LlmClassifier<P> {
    fn name(&self) -> &str {
        "llm"
    }

    async fn classify(
        &self,
        input: &ClassificationInput<'_>,
    ) -> Result<StatusDetectionResult, ClassificationError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: self.build_prompt(input),
            }],
            system: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: self.config.max_tokens,
            temperature: Some(0.0),
        };

        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| ClassificationError::Llm(e.to_string()))?;

        Ok(Self::parse_response(&response.content))
    }
}
