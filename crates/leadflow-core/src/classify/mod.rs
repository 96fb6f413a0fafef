//! Status classification: strategy selection, heuristic and LLM
//! implementations, fallback composition, and cultural-context fusion.

pub mod classifier;
pub mod fallback;
pub mod fusion;
pub mod heuristic;
pub mod llm;
pub mod strategy;

pub use classifier::{ClassificationInput, Classifier};
pub use fallback::FallbackClassifier;
pub use fusion::merge_cultural_context;
pub use heuristic::HeuristicClassifier;
pub use llm::LlmClassifier;
pub use strategy::StatusClassifier;
