//! Deterministic keyword/recency status classifier.
//!
//! Precedence is a total order; the first matching rule wins:
//! 1. refusal keywords -> Closed (regardless of recency)
//! 2. payment/booking confirmation -> Sold
//! 3. currently-on-tour keywords -> Service
//! 4. operator sent the last message and it is >30 days old -> Closed;
//!    a counterpart-last conversation is never closed on staleness alone
//! 5. qualification keywords (date/price/budget/headcount) -> Qualified
//! 6. counterpart's last message <7 days old: NewLead for tiny
//!    conversations, Warmed otherwise
//! 7. counterpart sent the last message but it is not recent -> Qualified
//! 8. default: NewLead for tiny conversations, Qualified otherwise

use chrono::{DateTime, Duration, Utc};

use leadflow_types::classify::StatusDetectionResult;
use leadflow_types::client::SalesStatus;
use leadflow_types::error::ClassificationError;

use super::classifier::{ClassificationInput, Classifier};

/// Fixed confidence for heuristic results.
pub const HEURISTIC_CONFIDENCE: f64 = 0.6;

/// Operator-last conversations older than this are considered abandoned.
const STALE_AFTER_DAYS: i64 = 30;

/// Counterpart activity within this window counts as recent.
const RECENT_WITHIN_DAYS: i64 = 7;

/// Conversations with at most this many messages are still "new".
const SMALL_CONVERSATION: usize = 2;

const REFUSAL_KEYWORDS: &[&str] = &[
    "not interested",
    "no thanks",
    "don't contact me",
    "do not contact me",
    "unsubscribe",
    "stop writing",
    "не интересно",
    "не интересует",
    "неинтересно",
    "не пишите",
    "отстаньте",
    "לא מעוניין",
    "לא מעוניינת",
    "לא רלוונטי",
    "no me interesa",
    "no gracias",
    "pas intéressé",
    "pas interessé",
    "غير مهتم",
    "لا شكرا",
];

const PAYMENT_KEYWORDS: &[&str] = &[
    "i paid",
    "i've paid",
    "payment sent",
    "payment received",
    "booking confirmed",
    "i booked",
    "deposit sent",
    "оплатил",
    "оплатила",
    "оплата прошла",
    "забронировал",
    "забронировала",
    "перевёл деньги",
    "перевел деньги",
    "שילמתי",
    "הזמנתי",
    "העברתי",
    "ya pagué",
    "ya pague",
    "reservé",
    "j'ai payé",
    "j'ai réservé",
    "دفعت",
    "حجزت",
];

const ON_TOUR_KEYWORDS: &[&str] = &[
    "on the tour",
    "during the tour",
    "currently on tour",
    "on tour now",
    "на экскурсии",
    "на туре",
    "сейчас в туре",
    "сейчас на туре",
    "בסיור",
    "en el tour",
    "في الجولة",
];

const QUALIFICATION_KEYWORDS: &[&str] = &[
    "how much",
    "price",
    "cost",
    "budget",
    "how many people",
    "what date",
    "which date",
    "what dates",
    "available",
    "availability",
    "when is",
    "when does",
    "сколько стоит",
    "сколько будет стоить",
    "цена",
    "стоимость",
    "бюджет",
    "сколько человек",
    "какого числа",
    "когда",
    "свободн",
    "כמה עולה",
    "מחיר",
    "מתי",
    "תאריך",
    "cuánto cuesta",
    "cuanto cuesta",
    "precio",
    "cuándo",
    "combien",
    "prix",
    "quand",
    "disponible",
    "السعر",
    "كم التكلفة",
    "متى",
];

/// Deterministic keyword/recency classifier. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    /// Classify at an explicit point in time.
    ///
    /// A pure function of its arguments: identical input and `now` always
    /// produce the same status and the same reasoning shape.
    pub fn classify_at(input: &ClassificationInput<'_>, now: DateTime<Utc>) -> StatusDetectionResult {
        let transcript = input
            .messages
            .iter()
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join("\n");

        if let Some(keyword) = find_keyword(&transcript, REFUSAL_KEYWORDS) {
            return result(SalesStatus::Closed, format!("explicit refusal ('{keyword}')"));
        }
        if let Some(keyword) = find_keyword(&transcript, PAYMENT_KEYWORDS) {
            return result(SalesStatus::Sold, format!("payment or booking confirmation ('{keyword}')"));
        }
        if let Some(keyword) = find_keyword(&transcript, ON_TOUR_KEYWORDS) {
            return result(SalesStatus::Service, format!("currently on tour ('{keyword}')"));
        }

        let small = input.messages.len() <= SMALL_CONVERSATION;

        if let Some(last) = input.messages.last() {
            let age = now.signed_duration_since(last.timestamp);

            if !last.from_counterpart() && age > Duration::days(STALE_AFTER_DAYS) {
                return result(
                    SalesStatus::Closed,
                    format!("no reply to operator for {} days", age.num_days()),
                );
            }

            if let Some(keyword) = find_keyword(&transcript, QUALIFICATION_KEYWORDS) {
                return result(SalesStatus::Qualified, format!("qualification question ('{keyword}')"));
            }

            if last.from_counterpart() {
                if age < Duration::days(RECENT_WITHIN_DAYS) {
                    return if small {
                        result(SalesStatus::NewLead, "recent first contact".to_string())
                    } else {
                        result(SalesStatus::Warmed, "recent ongoing conversation".to_string())
                    };
                }
                // The counterpart spoke last; they are waiting for a reply,
                // never closed on staleness alone.
                return result(
                    SalesStatus::Qualified,
                    "counterpart awaiting reply".to_string(),
                );
            }
        }

        if small {
            result(SalesStatus::NewLead, "small conversation, no signals".to_string())
        } else {
            result(SalesStatus::Qualified, "ongoing conversation, no signals".to_string())
        }
    }
}

fn find_keyword<'k>(transcript: &str, keywords: &[&'k str]) -> Option<&'k str> {
    keywords.iter().find(|k| transcript.contains(*k)).copied()
}

fn result(status: SalesStatus, reasoning: String) -> StatusDetectionResult {
    StatusDetectionResult::new(status, HEURISTIC_CONFIDENCE).with_reasoning(reasoning)
}

impl Classifier for HeuristicClassifier {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn classify(
        &self,
        input: &ClassificationInput<'_>,
    ) -> Result<StatusDetectionResult, ClassificationError> {
        Ok(Self::classify_at(input, Utc::now()))
    }
}
