//! Import run, duplicate-check, and persistence outcome types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an import run.
///
/// `Running` transitions to exactly one terminal value: `Completed` on a
/// normal end, `Failed` on an unrecoverable top-level error, `Paused` on
/// cancellation. Once terminal, the run result is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportRunStatus {
    Running,
    Completed,
    Failed,
    Paused,
}

impl ImportRunStatus {
    /// True when the run has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ImportRunStatus::Running)
    }
}

impl fmt::Display for ImportRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportRunStatus::Running => write!(f, "running"),
            ImportRunStatus::Completed => write!(f, "completed"),
            ImportRunStatus::Failed => write!(f, "failed"),
            ImportRunStatus::Paused => write!(f, "paused"),
        }
    }
}

impl FromStr for ImportRunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "running" => Ok(ImportRunStatus::Running),
            "completed" => Ok(ImportRunStatus::Completed),
            "failed" => Ok(ImportRunStatus::Failed),
            "paused" => Ok(ImportRunStatus::Paused),
            other => Err(format!("invalid import run status: '{other}'")),
        }
    }
}

/// A per-contact error recorded during an import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportContactError {
    /// Human-readable contact reference (name or phone).
    pub contact_ref: String,
    pub message: String,
}

/// Aggregated result of an import run.
///
/// Created at run start, mutated only by the orchestrator, immutable once
/// `status` is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRunResult {
    pub run_id: Uuid,
    pub organization_id: Uuid,
    pub status: ImportRunStatus,
    pub total_contacts: u32,
    pub processed: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub skipped_duplicates: u32,
    pub errors: Vec<ImportContactError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ImportRunResult {
    /// Start a new run in the `Running` state.
    pub fn begin(organization_id: Uuid, total_contacts: u32) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            organization_id,
            status: ImportRunStatus::Running,
            total_contacts,
            processed: 0,
            succeeded: 0,
            failed: 0,
            skipped_duplicates: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Record a per-contact failure.
    pub fn record_error(&mut self, contact_ref: impl Into<String>, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(ImportContactError {
            contact_ref: contact_ref.into(),
            message: message.into(),
        });
    }

    /// Transition to a terminal state and stamp the finish time.
    pub fn finish(&mut self, status: ImportRunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }
}

/// Options controlling an import run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Run the full pipeline but skip the final persistence step.
    pub dry_run: bool,
    /// Truncate the contact list before processing.
    pub limit: Option<usize>,
    /// Per-run override of the classifier strategy; `None` uses the
    /// configured default.
    pub use_llm: Option<bool>,
    /// Skip contacts whose phone already exists in the organization.
    pub skip_duplicates: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            limit: None,
            use_llm: None,
            skip_duplicates: true,
        }
    }
}

/// Kind of conflict found by the duplicate detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictType {
    Phone,
    Name,
}

/// Result of a duplicate check against the organization's existing clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateCheckResult {
    pub is_duplicate: bool,
    pub existing_client_id: Option<Uuid>,
    pub conflict_type: Option<ConflictType>,
}

impl DuplicateCheckResult {
    /// No existing client matched.
    pub fn not_duplicate() -> Self {
        Self {
            is_duplicate: false,
            existing_client_id: None,
            conflict_type: None,
        }
    }
}

/// Outcome of a transactional persist for one contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistOutcome {
    pub client_id: Uuid,
    pub conversation_id: Uuid,
    /// Messages actually inserted (conflicts on source id are skipped).
    pub messages_inserted: u32,
    /// True when an existing client row was updated instead of created.
    pub client_updated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_roundtrip() {
        for status in [
            ImportRunStatus::Running,
            ImportRunStatus::Completed,
            ImportRunStatus::Failed,
            ImportRunStatus::Paused,
        ] {
            assert_eq!(status, status.to_string().parse().unwrap());
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ImportRunStatus::Running.is_terminal());
        assert!(ImportRunStatus::Completed.is_terminal());
        assert!(ImportRunStatus::Failed.is_terminal());
        assert!(ImportRunStatus::Paused.is_terminal());
    }

    #[test]
    fn test_begin_starts_running_with_zero_counters() {
        let result = ImportRunResult::begin(Uuid::now_v7(), 10);
        assert_eq!(result.status, ImportRunStatus::Running);
        assert_eq!(result.total_contacts, 10);
        assert_eq!(result.processed, 0);
        assert_eq!(result.succeeded, 0);
        assert_eq!(result.failed, 0);
        assert_eq!(result.skipped_duplicates, 0);
        assert!(result.errors.is_empty());
        assert!(result.finished_at.is_none());
    }

    #[test]
    fn test_record_error_increments_failed() {
        let mut result = ImportRunResult::begin(Uuid::now_v7(), 1);
        result.record_error("+15551234567", "extraction failed");
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].contact_ref, "+15551234567");
    }

    #[test]
    fn test_finish_stamps_time() {
        let mut result = ImportRunResult::begin(Uuid::now_v7(), 0);
        result.finish(ImportRunStatus::Completed);
        assert_eq!(result.status, ImportRunStatus::Completed);
        assert!(result.finished_at.is_some());
    }

    #[test]
    fn test_default_options_skip_duplicates() {
        let options = ImportOptions::default();
        assert!(options.skip_duplicates);
        assert!(!options.dry_run);
        assert!(options.limit.is_none());
        assert!(options.use_llm.is_none());
    }
}
