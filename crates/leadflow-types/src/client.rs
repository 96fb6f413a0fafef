//! Client record, sales-funnel status, and parsed conversation types.
//!
//! `ParsedClientData` is the pipeline's working record: built once per
//! contact, normalized in place by validation, consumed exactly once by the
//! importer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Sales-funnel status of a client.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('new_lead', 'qualified', 'warmed', 'proposal_sent',
/// 'negotiation', 'sold', 'service', 'closed'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesStatus {
    NewLead,
    Qualified,
    Warmed,
    ProposalSent,
    Negotiation,
    Sold,
    Service,
    Closed,
}

impl SalesStatus {
    /// All valid statuses, in funnel order.
    pub const ALL: [SalesStatus; 8] = [
        SalesStatus::NewLead,
        SalesStatus::Qualified,
        SalesStatus::Warmed,
        SalesStatus::ProposalSent,
        SalesStatus::Negotiation,
        SalesStatus::Sold,
        SalesStatus::Service,
        SalesStatus::Closed,
    ];
}

impl fmt::Display for SalesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalesStatus::NewLead => write!(f, "new_lead"),
            SalesStatus::Qualified => write!(f, "qualified"),
            SalesStatus::Warmed => write!(f, "warmed"),
            SalesStatus::ProposalSent => write!(f, "proposal_sent"),
            SalesStatus::Negotiation => write!(f, "negotiation"),
            SalesStatus::Sold => write!(f, "sold"),
            SalesStatus::Service => write!(f, "service"),
            SalesStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for SalesStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new_lead" => Ok(SalesStatus::NewLead),
            "qualified" => Ok(SalesStatus::Qualified),
            "warmed" => Ok(SalesStatus::Warmed),
            "proposal_sent" => Ok(SalesStatus::ProposalSent),
            "negotiation" => Ok(SalesStatus::Negotiation),
            "sold" => Ok(SalesStatus::Sold),
            "service" => Ok(SalesStatus::Service),
            "closed" => Ok(SalesStatus::Closed),
            other => Err(format!("invalid sales status: '{other}'")),
        }
    }
}

impl Default for SalesStatus {
    fn default() -> Self {
        SalesStatus::NewLead
    }
}

/// Direction of a message relative to the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

impl fmt::Display for MessageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageDirection::Incoming => write!(f, "incoming"),
            MessageDirection::Outgoing => write!(f, "outgoing"),
        }
    }
}

impl FromStr for MessageDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "incoming" => Ok(MessageDirection::Incoming),
            "outgoing" => Ok(MessageDirection::Outgoing),
            other => Err(format!("invalid message direction: '{other}'")),
        }
    }
}

/// Who authored a message.
///
/// `Client` is the counterpart; `Ai` and `Human` are the operator side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    Client,
    Ai,
    Human,
}

impl fmt::Display for MessageSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSender::Client => write!(f, "client"),
            MessageSender::Ai => write!(f, "ai"),
            MessageSender::Human => write!(f, "human"),
        }
    }
}

impl FromStr for MessageSender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(MessageSender::Client),
            "ai" => Ok(MessageSender::Ai),
            "human" => Ok(MessageSender::Human),
            other => Err(format!("invalid message sender: '{other}'")),
        }
    }
}

/// A single parsed message within a contact's conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedMessage {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub direction: MessageDirection,
    pub sender: MessageSender,
    /// Detected language of this message, if any.
    pub language: Option<String>,
    /// Source message id from the extraction layer, used for idempotent
    /// re-import.
    pub source_message_id: Option<String>,
}

impl ParsedMessage {
    /// True when the counterpart (not the operator) sent this message.
    pub fn from_counterpart(&self) -> bool {
        self.sender == MessageSender::Client
    }
}

/// Cultural context inferred for a client.
///
/// Language is the primary signal; phone country prefix is secondary and
/// only fills fields language left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CulturalContext {
    pub likely_origin: Option<String>,
    pub region: Option<String>,
    pub communication_style: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub cultural_notes: Vec<String>,
    pub confidence: Option<f64>,
}

impl CulturalContext {
    /// True when no field carries any information.
    pub fn is_empty(&self) -> bool {
        self.likely_origin.is_none()
            && self.region.is_none()
            && self.communication_style.is_none()
            && self.dietary_restrictions.is_empty()
            && self.cultural_notes.is_empty()
    }
}

/// A contact's conversation turned into a structured, import-ready record.
///
/// Invariant: `first_message_date <= last_message_date`. Records violating it
/// are rejected by validation before any persistence side effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedClientData {
    /// E.164 phone number after validation normalizes it in place.
    pub phone: String,
    pub name: Option<String>,
    pub preferred_language: String,
    pub detected_status: SalesStatus,
    pub cultural_context: Option<CulturalContext>,
    pub messages: Vec<ParsedMessage>,
    pub first_message_date: DateTime<Utc>,
    pub last_message_date: DateTime<Utc>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ParsedClientData {
    /// Human-readable reference for error reporting: name if present, else phone.
    pub fn contact_ref(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.phone)
    }
}

/// A stored client record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub preferred_language: String,
    pub status: SalesStatus,
    pub cultural_context: Option<CulturalContext>,
    pub first_contact_at: Option<DateTime<Utc>>,
    pub last_contact_at: Option<DateTime<Utc>>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-organization record counts for the status dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub organization_id: Uuid,
    pub client_count: u64,
    pub message_count: u64,
}
