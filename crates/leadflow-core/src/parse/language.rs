//! Script- and keyword-based language detection.
//!
//! Non-Latin scripts are unambiguous and take precedence; Latin-script text
//! is matched against per-language keyword lists, defaulting to English.

use std::collections::HashMap;

use leadflow_types::client::ParsedMessage;

/// Language codes the pipeline supports end to end.
pub const SUPPORTED_LANGUAGES: [&str; 6] = ["en", "ru", "he", "es", "fr", "ar"];

/// Fallback language when detection finds nothing.
pub const DEFAULT_LANGUAGE: &str = "en";

const SPANISH_KEYWORDS: &[&str] = &[
    "hola", "gracias", "buenos", "buenas", "cuanto", "cuánto", "precio", "por", "favor", "quiero",
    "necesito", "cuando", "cuándo", "donde", "dónde",
];

const FRENCH_KEYWORDS: &[&str] = &[
    "bonjour", "bonsoir", "merci", "combien", "prix", "quand", "vous", "je", "voudrais",
    "s'il", "oui", "pourquoi",
];

/// True when `code` is a supported language.
pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// Detect the language of a single text.
///
/// Script detection runs first: any Cyrillic, Hebrew, or Arabic character
/// decides the result. Latin-script text falls through to keyword matching
/// (Spanish, French), then defaults to `en`.
pub fn detect_language(text: &str) -> &'static str {
    for ch in text.chars() {
        match ch {
            '\u{0400}'..='\u{04FF}' => return "ru",
            '\u{0590}'..='\u{05FF}' => return "he",
            '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' => return "ar",
            _ => {}
        }
    }

    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();

    let spanish = words.iter().filter(|w| SPANISH_KEYWORDS.contains(w)).count();
    let french = words.iter().filter(|w| FRENCH_KEYWORDS.contains(w)).count();

    if spanish > french && spanish > 0 {
        "es"
    } else if french > 0 {
        "fr"
    } else {
        DEFAULT_LANGUAGE
    }
}

/// Detect the dominant language across a conversation by majority vote over
/// per-message detection. Defaults to `en` for empty input.
pub fn detect_primary_language(messages: &[ParsedMessage]) -> &'static str {
    if messages.is_empty() {
        return DEFAULT_LANGUAGE;
    }

    let mut votes: HashMap<&'static str, usize> = HashMap::new();
    for message in messages {
        *votes.entry(detect_language(&message.content)).or_default() += 1;
    }

    votes
        .into_iter()
        // Ties break deterministically toward the alphabetically first code.
        .max_by(|(la, ca), (lb, cb)| ca.cmp(cb).then_with(|| lb.cmp(la)))
        .map(|(lang, _)| lang)
        .unwrap_or(DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use leadflow_types::client::{MessageDirection, MessageSender};

    fn msg(content: &str) -> ParsedMessage {
        ParsedMessage {
            content: content.to_string(),
            timestamp: Utc::now(),
            direction: MessageDirection::Incoming,
            sender: MessageSender::Client,
            language: None,
            source_message_id: None,
        }
    }

    #[test]
    fn test_cyrillic_wins_over_keywords() {
        assert_eq!(detect_language("Привет, hola bonjour"), "ru");
    }

    #[test]
    fn test_hebrew_detection() {
        assert_eq!(detect_language("שלום, מה שלומך?"), "he");
    }

    #[test]
    fn test_arabic_detection() {
        assert_eq!(detect_language("مرحبا كيف حالك"), "ar");
    }

    #[test]
    fn test_spanish_keywords() {
        assert_eq!(detect_language("Hola, cuánto cuesta el tour? Gracias"), "es");
    }

    #[test]
    fn test_french_keywords() {
        assert_eq!(detect_language("Bonjour, combien coûte le tour? Merci"), "fr");
    }

    #[test]
    fn test_plain_english_defaults() {
        assert_eq!(detect_language("Hi, when is the tour available?"), "en");
        assert_eq!(detect_language(""), "en");
        assert_eq!(detect_language("12345 !!!"), "en");
    }

    #[test]
    fn test_primary_language_majority_vote() {
        let messages = vec![
            msg("Привет"),
            msg("Сколько стоит тур?"),
            msg("ok thanks"),
        ];
        assert_eq!(detect_primary_language(&messages), "ru");
    }

    #[test]
    fn test_primary_language_empty_defaults() {
        assert_eq!(detect_primary_language(&[]), "en");
    }

    #[test]
    fn test_primary_language_single_message() {
        assert_eq!(detect_primary_language(&[msg("שלום")]), "he");
    }
}
