//! Raw extraction types delivered by the external chat-extraction client.
//!
//! These are immutable inputs: the pipeline never mutates them, only parses
//! them into [`crate::client::ParsedClientData`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Media type of an extracted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Text,
    Image,
    Audio,
    Video,
    Document,
    Other,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Text => write!(f, "text"),
            MediaType::Image => write!(f, "image"),
            MediaType::Audio => write!(f, "audio"),
            MediaType::Video => write!(f, "video"),
            MediaType::Document => write!(f, "document"),
            MediaType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(MediaType::Text),
            "image" => Ok(MediaType::Image),
            "audio" => Ok(MediaType::Audio),
            "video" => Ok(MediaType::Video),
            "document" => Ok(MediaType::Document),
            "other" => Ok(MediaType::Other),
            other => Err(format!("invalid media type: '{other}'")),
        }
    }
}

impl Default for MediaType {
    fn default() -> Self {
        MediaType::Text
    }
}

/// A contact as delivered by the extraction client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedContact {
    pub phone: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl ExtractedContact {
    /// Human-readable reference for error reporting before parsing.
    pub fn contact_ref(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.phone)
    }
}

/// A message as delivered by the extraction client.
///
/// Messages arrive ordered by `timestamp` ascending per contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedMessage {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// True when the operator side sent this message.
    pub from_operator: bool,
    #[serde(default)]
    pub media_type: MediaType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_roundtrip() {
        for media in [
            MediaType::Text,
            MediaType::Image,
            MediaType::Audio,
            MediaType::Video,
            MediaType::Document,
            MediaType::Other,
        ] {
            assert_eq!(media, media.to_string().parse().unwrap());
        }
    }

    #[test]
    fn test_media_type_defaults_to_text() {
        let json = r#"{"id": "m1", "content": "hi", "timestamp": "2025-06-01T10:00:00Z", "from_operator": false}"#;
        let msg: ExtractedMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.media_type, MediaType::Text);
    }

    #[test]
    fn test_contact_ref_falls_back_to_phone() {
        let contact = ExtractedContact {
            phone: "+15551234567".to_string(),
            display_name: None,
            avatar_url: None,
        };
        assert_eq!(contact.contact_ref(), "+15551234567");
    }
}
