//! Best-effort name extraction from conversation openings and contact
//! display names.

use leadflow_types::client::ParsedMessage;

use super::phone::normalize_phone_number;

/// How many of the counterpart's opening messages are scanned for an
/// introduction phrase.
const INTRO_MESSAGE_WINDOW: usize = 3;

/// Introduction phrases per supported language, as lowercase token
/// sequences. The tokens immediately following a match are the candidate
/// name.
const INTRO_PATTERNS: &[&[&str]] = &[
    &["my", "name", "is"],
    &["i'm"],
    &["i", "am"],
    &["this", "is"],
    &["меня", "зовут"],
    &["моё", "имя"],
    &["мое", "имя"],
    &["קוראים", "לי"],
    &["שמי"],
    &["me", "llamo"],
    &["mi", "nombre", "es"],
    &["je", "m'appelle"],
    &["mon", "nom", "est"],
    &["اسمي"],
];

/// Pick the best available name for a contact.
///
/// A name the counterpart states in their first few messages outranks the
/// contact's display name. Either source is discarded when it normalizes to
/// the contact's own phone number or is otherwise non-name-like.
pub fn extract_best_name(
    contact_name: Option<&str>,
    messages: &[ParsedMessage],
    phone: &str,
) -> Option<String> {
    let stated = messages
        .iter()
        .filter(|m| m.from_counterpart())
        .take(INTRO_MESSAGE_WINDOW)
        .find_map(|m| stated_name(&m.content));

    stated
        .into_iter()
        .chain(contact_name.map(str::to_string))
        .find(|candidate| is_name_like(candidate, phone))
}

/// Scan one message for an introduction phrase and return the tokens that
/// follow it.
fn stated_name(content: &str) -> Option<String> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let lowered: Vec<String> = tokens
        .iter()
        .map(|t| trim_punctuation(t).to_lowercase())
        .collect();

    for pattern in INTRO_PATTERNS {
        for start in 0..lowered.len() {
            let end = start + pattern.len();
            if end > lowered.len() {
                break;
            }
            if lowered[start..end] != **pattern {
                continue;
            }
            if let Some(name) = collect_name_tokens(&tokens[end..]) {
                return Some(name);
            }
        }
    }
    None
}

/// Take at most two tokens after the introduction phrase as the name.
///
/// The second token is only kept when it starts with an uppercase letter,
/// so "I'm Alice and I want a tour" yields "Alice" while
/// "меня зовут Анна Мария" keeps both words.
fn collect_name_tokens(rest: &[&str]) -> Option<String> {
    let first = trim_punctuation(rest.first()?);
    if first.is_empty() {
        return None;
    }

    let mut name = first.to_string();
    if let Some(second_raw) = rest.get(1) {
        let second = trim_punctuation(second_raw);
        if second.chars().next().is_some_and(char::is_uppercase) {
            name.push(' ');
            name.push_str(second);
        }
    }
    Some(name)
}

fn trim_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
}

/// Reject candidates that are really phone numbers or otherwise non-name-like.
fn is_name_like(candidate: &str, phone: &str) -> bool {
    let trimmed = candidate.trim();
    if trimmed.chars().count() < 2 {
        return false;
    }
    if trimmed.chars().all(|c| c.is_ascii_digit() || c == '+' || c.is_whitespace()) {
        return false;
    }
    if !trimmed.chars().any(char::is_alphabetic) {
        return false;
    }
    // A display name that is just the phone in disguise is not a name.
    if let (Some(as_phone), Some(own)) = (
        normalize_phone_number(trimmed),
        normalize_phone_number(phone),
    ) {
        if as_phone == own {
            return false;
        }
    }
    true
}
