//! JSON-file chat extractor.
//!
//! Implements `ChatExtractor` over a chat-export file, giving the CLI a
//! concrete input source. The live browser-automation extractor satisfies
//! the same trait and is out of scope here.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use leadflow_core::extract::ChatExtractor;
use leadflow_types::error::ExtractionError;
use leadflow_types::extract::{ExtractedContact, ExtractedMessage};

/// One contact entry in the export file.
#[derive(Debug, Deserialize)]
struct ExportContact {
    phone: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    #[serde(default)]
    messages: Vec<ExtractedMessage>,
}

/// Top-level shape of the export file.
#[derive(Debug, Deserialize)]
struct ExportFile {
    contacts: Vec<ExportContact>,
}

/// Extractor over a chat-export JSON file loaded once at startup.
#[derive(Debug)]
pub struct JsonFileExtractor {
    contacts: Vec<ExtractedContact>,
    messages: HashMap<String, Vec<ExtractedMessage>>,
}

impl JsonFileExtractor {
    /// Load and index an export file.
    pub async fn load(path: &Path) -> Result<Self, ExtractionError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ExtractionError::Unavailable(format!("cannot read {}: {e}", path.display()))
        })?;

        let export: ExportFile = serde_json::from_str(&content).map_err(|e| {
            ExtractionError::Unavailable(format!("cannot parse {}: {e}", path.display()))
        })?;

        let mut contacts = Vec::with_capacity(export.contacts.len());
        let mut messages = HashMap::with_capacity(export.contacts.len());
        for contact in export.contacts {
            let mut conversation = contact.messages;
            // The contract delivers messages ordered by timestamp ascending;
            // exports from other tooling may not be.
            conversation.sort_by_key(|m| m.timestamp);

            contacts.push(ExtractedContact {
                phone: contact.phone.clone(),
                display_name: contact.display_name,
                avatar_url: contact.avatar_url,
            });
            messages.insert(contact.phone, conversation);
        }

        tracing::debug!(path = %path.display(), contacts = contacts.len(), "loaded chat export");
        Ok(Self { contacts, messages })
    }
}

impl ChatExtractor for JsonFileExtractor {
    async fn extract_contacts(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ExtractedContact>, ExtractionError> {
        let mut contacts = self.contacts.clone();
        if let Some(limit) = limit {
            contacts.truncate(limit);
        }
        Ok(contacts)
    }

    async fn extract_messages(&self, phone: &str) -> Result<Vec<ExtractedMessage>, ExtractionError> {
        self.messages
            .get(phone)
            .cloned()
            .ok_or_else(|| ExtractionError::Messages {
                contact_ref: phone.to_string(),
                message: "contact not present in export".to_string(),
            })
    }
}
