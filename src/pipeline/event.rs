//! Raw inbound events as delivered by the chat platform webhook
//!
//! Field names follow the Telegram Bot API `Update` schema. Only the fields the
//! pipeline consumes are modelled; everything else in the payload is ignored.

use serde::{Deserialize, Serialize};

use super::NormalizationError;

/// Telegram Update object (simplified)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawInboundEvent {
    pub update_id: i64,
    pub message: Option<InboundMessage>,
}

impl RawInboundEvent {
    /// Parse a raw webhook payload
    ///
    /// # Errors
    ///
    /// Returns [`NormalizationError::Malformed`] if the payload is not a valid update
    pub fn from_slice(payload: &[u8]) -> Result<Self, NormalizationError> {
        serde_json::from_slice(payload).map_err(NormalizationError::Malformed)
    }
}

/// Telegram Message object (simplified)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InboundMessage {
    pub message_id: i64,
    pub chat: InboundChat,
    /// Absent for channel posts
    pub from: Option<InboundUser>,
    pub text: Option<String>,
    pub caption: Option<String>,
    #[serde(default)]
    pub date: i64,
    /// Photo variants, ascending resolution
    pub photo: Option<Vec<PhotoVariant>>,
    pub document: Option<DocumentRef>,
}

impl InboundMessage {
    /// Whether the message carries anything the pipeline can answer
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
            || self.photo.as_ref().is_some_and(|p| !p.is_empty())
            || self.document.is_some()
    }
}

/// Telegram Chat object
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InboundChat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub chat_type: String,
}

/// Telegram User object
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InboundUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// One resolution of a photo attachment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PhotoVariant {
    pub file_id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub file_size: u64,
}

/// Document/file attachment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentRef {
    pub file_id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_photo_update() {
        let payload = br#"{
            "update_id": 10,
            "message": {
                "message_id": 7,
                "date": 1700000000,
                "chat": {"id": -100, "type": "group", "title": "Trip"},
                "from": {"id": 42, "is_bot": false, "first_name": "Ana", "username": "ana"},
                "caption": "dinner",
                "photo": [
                    {"file_id": "small", "file_unique_id": "u1", "width": 90, "height": 60, "file_size": 1200},
                    {"file_id": "large", "file_unique_id": "u2", "width": 800, "height": 600}
                ]
            }
        }"#;

        let event = RawInboundEvent::from_slice(payload).unwrap();
        let message = event.message.unwrap();
        assert_eq!(message.chat.id, -100);
        assert_eq!(message.chat.chat_type, "group");
        assert_eq!(message.caption.as_deref(), Some("dinner"));

        let photos = message.photo.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[1].file_id, "large");
        assert_eq!(photos[1].file_size, 0);
    }

    #[test]
    fn parses_update_without_message() {
        let event = RawInboundEvent::from_slice(br#"{"update_id": 3}"#).unwrap();
        assert!(event.message.is_none());
    }

    #[test]
    fn rejects_malformed_payload() {
        let err = RawInboundEvent::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, NormalizationError::Malformed(_)));

        let err = RawInboundEvent::from_slice(br#"{"update_id": "x"}"#).unwrap_err();
        assert!(matches!(err, NormalizationError::Malformed(_)));
    }

    #[test]
    fn body_detection() {
        let mut message = InboundMessage::default();
        assert!(!message.has_body());

        message.text = Some(String::new());
        assert!(!message.has_body());

        message.photo = Some(vec![]);
        assert!(!message.has_body());

        message.text = Some("hi".to_string());
        assert!(message.has_body());

        message.text = None;
        message.document = Some(DocumentRef {
            file_id: "d".to_string(),
            file_name: "receipt.pdf".to_string(),
            file_size: 10,
        });
        assert!(message.has_body());
    }
}
