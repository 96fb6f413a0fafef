//! Import pipeline: validation, duplicate detection, and the run
//! orchestrator.

pub mod dedupe;
pub mod orchestrator;
pub mod validator;

pub use dedupe::check_duplicate;
pub use orchestrator::ImportOrchestrator;
pub use validator::{validate_client_data, ValidationReport};
