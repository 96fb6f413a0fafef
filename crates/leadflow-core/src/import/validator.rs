//! Client record validation.
//!
//! Successful validation normalizes the record in place: phone to E.164,
//! phone-shaped names to absent, unsupported languages to the default.

use leadflow_types::client::ParsedClientData;

use crate::parse::language::is_supported_language;
use crate::parse::phone::normalize_phone_number;
use crate::parse::DEFAULT_LANGUAGE;

/// Outcome of validating one record.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Joined error text for per-contact error reporting.
    pub fn error_text(&self) -> String {
        self.errors.join("; ")
    }
}

/// Validate and normalize a parsed client record.
///
/// Errors (record rejected): phone that cannot normalize to E.164, or
/// `first_message_date > last_message_date`. Warnings (record downgraded):
/// missing or phone-shaped name, unsupported language code.
pub fn validate_client_data(record: &mut ParsedClientData) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match normalize_phone_number(&record.phone) {
        Some(normalized) => record.phone = normalized,
        None => errors.push(format!(
            "phone '{}' cannot be normalized to E.164",
            record.phone
        )),
    }

    if record.first_message_date > record.last_message_date {
        errors.push(format!(
            "first message date {} is after last message date {}",
            record.first_message_date, record.last_message_date
        ));
    }

    match record.name.as_deref() {
        None => warnings.push("no usable name, storing client without one".to_string()),
        Some(name) => {
            let phone_shaped = normalize_phone_number(name).is_some()
                || name.chars().all(|c| c.is_ascii_digit() || c == '+' || c.is_whitespace());
            if phone_shaped || name.trim().chars().count() < 2 {
                // Never store a phone number as a name.
                warnings.push(format!("discarding non-name-like name '{name}'"));
                record.name = None;
            }
        }
    }

    if !is_supported_language(&record.preferred_language) {
        warnings.push(format!(
            "unsupported language '{}', defaulting to '{DEFAULT_LANGUAGE}'",
            record.preferred_language
        ));
        record.preferred_language = DEFAULT_LANGUAGE.to_string();
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}
