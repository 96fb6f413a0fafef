//! Session artifact types for browser-automation login persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a session artifact row.
///
/// `Cleared` means the payload was soft-invalidated: the row survives so
/// re-authentication can reuse the same primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionArtifactStatus {
    Active,
    Cleared,
}

impl fmt::Display for SessionArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionArtifactStatus::Active => write!(f, "active"),
            SessionArtifactStatus::Cleared => write!(f, "cleared"),
        }
    }
}

impl FromStr for SessionArtifactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionArtifactStatus::Active),
            "cleared" => Ok(SessionArtifactStatus::Cleared),
            other => Err(format!("invalid session artifact status: '{other}'")),
        }
    }
}

/// An opaque serialized automation-login state, one row per organization.
///
/// The payload is exclusively owned by the session store: overwritten whole
/// on each snapshot, never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionArtifact {
    pub organization_id: Uuid,
    pub payload: Vec<u8>,
    pub status: SessionArtifactStatus,
    pub updated_at: DateTime<Utc>,
}
