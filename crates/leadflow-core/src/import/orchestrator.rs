//! Import run orchestrator.
//!
//! Drives the per-contact pipeline sequentially: extract -> parse ->
//! classify -> validate -> dedupe -> transactional persist, aggregating a
//! run-level result. Per-contact errors never abort the run; only a failure
//! to list contacts at all flips the run to `Failed`. Cancellation lets the
//! in-flight contact finish and ends the run as `Paused`.

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use leadflow_types::client::{MessageDirection, MessageSender, ParsedClientData, ParsedMessage};
use leadflow_types::error::ClassificationError;
use leadflow_types::extract::{ExtractedContact, ExtractedMessage};
use leadflow_types::import::{ConflictType, ImportOptions, ImportRunResult, ImportRunStatus};

use crate::classify::classifier::{ClassificationInput, Classifier};
use crate::classify::fusion::merge_cultural_context;
use crate::classify::strategy::StatusClassifier;
use crate::extract::ChatExtractor;
use crate::import::dedupe::check_duplicate;
use crate::import::validator::validate_client_data;
use crate::parse::culture::detect_cultural_context;
use crate::parse::language::{detect_language, detect_primary_language};
use crate::parse::name::extract_best_name;
use crate::repository::client::ClientRepository;

/// End-to-end import pipeline for one organization.
pub struct ImportOrchestrator<X, R, L>
where
    X: ChatExtractor,
    R: ClientRepository,
    L: Classifier,
{
    organization_id: Uuid,
    extractor: X,
    repository: R,
    classifier: StatusClassifier<L>,
}

impl<X, R, L> ImportOrchestrator<X, R, L>
where
    X: ChatExtractor,
    R: ClientRepository,
    L: Classifier,
{
    pub fn new(
        organization_id: Uuid,
        extractor: X,
        repository: R,
        classifier: StatusClassifier<L>,
    ) -> Self {
        Self {
            organization_id,
            extractor,
            repository,
            classifier,
        }
    }

    /// Run a full import and return the aggregated result.
    ///
    /// The result reaches a terminal status on every path: `Completed`
    /// normally, `Paused` on cancellation, `Failed` only when the contact
    /// list itself cannot be fetched.
    pub async fn run(
        &self,
        options: &ImportOptions,
        cancel: &CancellationToken,
    ) -> ImportRunResult {
        let mut contacts = match self.extractor.extract_contacts(options.limit).await {
            Ok(contacts) => contacts,
            Err(error) => {
                tracing::error!(organization = %self.organization_id, %error, "failed to list contacts");
                let mut result = ImportRunResult::begin(self.organization_id, 0);
                result.record_error("(run)", format!("failed to list contacts: {error}"));
                result.finish(ImportRunStatus::Failed);
                return result;
            }
        };

        // The extractor contract accepts the limit too, but the cap is the
        // orchestrator's responsibility.
        if let Some(limit) = options.limit {
            contacts.truncate(limit);
        }

        let mut result = ImportRunResult::begin(self.organization_id, contacts.len() as u32);
        tracing::info!(
            run = %result.run_id,
            organization = %self.organization_id,
            contacts = contacts.len(),
            dry_run = options.dry_run,
            "starting import run"
        );

        for contact in &contacts {
            if cancel.is_cancelled() {
                tracing::warn!(
                    run = %result.run_id,
                    processed = result.processed,
                    "import cancelled, pausing run"
                );
                result.finish(ImportRunStatus::Paused);
                return result;
            }

            self.process_contact(contact, options, &mut result).await;
            result.processed += 1;
        }

        result.finish(ImportRunStatus::Completed);
        tracing::info!(
            run = %result.run_id,
            succeeded = result.succeeded,
            failed = result.failed,
            skipped_duplicates = result.skipped_duplicates,
            "import run completed"
        );
        result
    }

    async fn process_contact(
        &self,
        contact: &ExtractedContact,
        options: &ImportOptions,
        result: &mut ImportRunResult,
    ) {
        let contact_ref = contact.contact_ref().to_string();

        let messages = match self.extractor.extract_messages(&contact.phone).await {
            Ok(messages) => messages,
            Err(error) => {
                result.record_error(&contact_ref, format!("message extraction failed: {error}"));
                return;
            }
        };
        if messages.is_empty() {
            result.record_error(&contact_ref, "conversation contains no messages");
            return;
        }

        let mut record = match self.build_client_data(contact, &messages, options.use_llm).await {
            Ok(record) => record,
            Err(error) => {
                result.record_error(&contact_ref, format!("classification failed: {error}"));
                return;
            }
        };

        let report = validate_client_data(&mut record);
        for warning in &report.warnings {
            tracing::debug!(contact = %contact_ref, warning, "validation warning");
        }
        if !report.is_valid {
            result.record_error(&contact_ref, report.error_text());
            return;
        }

        let duplicate =
            match check_duplicate(&self.repository, &self.organization_id, &record).await {
                Ok(duplicate) => duplicate,
                Err(error) => {
                    result.record_error(&contact_ref, format!("duplicate check failed: {error}"));
                    return;
                }
            };

        if duplicate.is_duplicate {
            if duplicate.conflict_type == Some(ConflictType::Name) {
                tracing::warn!(
                    contact = %contact_ref,
                    existing = ?duplicate.existing_client_id,
                    "duplicate phone with a conflicting name"
                );
            }
            if options.skip_duplicates {
                result.skipped_duplicates += 1;
                return;
            }
        }

        if options.dry_run {
            tracing::info!(
                contact = %contact_ref,
                status = %record.detected_status,
                "dry run, skipping persistence"
            );
            result.succeeded += 1;
            return;
        }

        match self
            .repository
            .persist_import(&self.organization_id, &record, duplicate.existing_client_id)
            .await
        {
            Ok(outcome) => {
                tracing::debug!(
                    contact = %contact_ref,
                    client = %outcome.client_id,
                    messages_inserted = outcome.messages_inserted,
                    "contact persisted"
                );
                result.succeeded += 1;
            }
            Err(error) => {
                result.record_error(&contact_ref, format!("persistence failed: {error}"));
            }
        }
    }

    /// Build the structured record for one contact: parse messages, detect
    /// language/name/cultural context, classify status with the configured
    /// strategy, and fuse the classifier's context with the parser's.
    async fn build_client_data(
        &self,
        contact: &ExtractedContact,
        messages: &[ExtractedMessage],
        use_llm: Option<bool>,
    ) -> Result<ParsedClientData, ClassificationError> {
        let parsed: Vec<ParsedMessage> = messages.iter().map(to_parsed_message).collect();
        // Messages arrive ordered by timestamp ascending.
        let first_message_date = parsed.first().map(|m| m.timestamp).unwrap_or_default();
        let last_message_date = parsed.last().map(|m| m.timestamp).unwrap_or_default();

        let language = detect_primary_language(&parsed);
        let name = extract_best_name(contact.display_name.as_deref(), &parsed, &contact.phone);
        let contact_ref = name.clone().unwrap_or_else(|| contact.phone.clone());

        let detection = self
            .classifier
            .detect_status(
                &ClassificationInput {
                    contact_ref: &contact_ref,
                    messages: &parsed,
                    first_message_date,
                    last_message_date,
                    language,
                },
                use_llm,
            )
            .await?;

        let parser_context = detect_cultural_context(language, Some(&contact.phone));
        let context = match &detection.cultural_context {
            Some(classifier_context) => merge_cultural_context(&parser_context, classifier_context),
            None => parser_context,
        };

        let metadata = serde_json::json!({
            "source": "chat_import",
            "avatar_url": contact.avatar_url,
            "message_count": parsed.len(),
            "classification": {
                "confidence": detection.confidence,
                "reasoning": detection.reasoning,
            },
        });

        Ok(ParsedClientData {
            phone: contact.phone.clone(),
            name,
            preferred_language: language.to_string(),
            detected_status: detection.status,
            cultural_context: (!context.is_empty()).then_some(context),
            messages: parsed,
            first_message_date,
            last_message_date,
            metadata,
        })
    }
}

fn to_parsed_message(message: &ExtractedMessage) -> ParsedMessage {
    ParsedMessage {
        content: message.content.clone(),
        timestamp: message.timestamp,
        direction: if message.from_operator {
            MessageDirection::Outgoing
        } else {
            MessageDirection::Incoming
        },
        sender: if message.from_operator {
            MessageSender::Human
        } else {
            MessageSender::Client
        },
        language: Some(detect_language(&message.content).to_string()),
        source_message_id: Some(message.id.clone()),
    }
}
