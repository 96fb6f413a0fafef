//! Classification result types.

use serde::{Deserialize, Serialize};

use crate::client::{CulturalContext, SalesStatus};

/// Result of a status classification, from either the heuristic or the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusDetectionResult {
    pub status: SalesStatus,
    /// Confidence in [0, 1]. Heuristic results carry a fixed mid-range
    /// value; LLM results carry the model-reported value clamped.
    pub confidence: f64,
    pub reasoning: Option<String>,
    pub cultural_context: Option<CulturalContext>,
}

impl StatusDetectionResult {
    /// Build a result with the confidence clamped into [0, 1].
    pub fn new(status: SalesStatus, confidence: f64) -> Self {
        Self {
            status,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: None,
            cultural_context: None,
        }
    }

    /// Attach a reasoning string.
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}
