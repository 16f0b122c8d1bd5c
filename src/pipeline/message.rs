//! Canonical message produced by the normalizer

use serde::Serialize;

use super::event::InboundUser;

/// Text pulled out of an attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentExtraction {
    /// File id of the photo variant or document that was read
    pub file_id: String,
    /// Fetchable URL handed to the OCR provider
    pub url: String,
    /// Extracted text, or the failure sentinel
    pub extracted_text: String,
}

/// Who sent the message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sender {
    pub id: i64,
    pub display_name: String,
}

impl From<&InboundUser> for Sender {
    fn from(user: &InboundUser) -> Self {
        let display_name = user
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .map_or_else(|| user.first_name.clone(), str::to_string);

        Self {
            id: user.id,
            display_name,
        }
    }
}

/// Platform-neutral message handed to the response producer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalMessage {
    /// Message text, or the caption when an attachment carried one
    pub text: String,
    pub attachment: Option<AttachmentExtraction>,
    pub sender: Option<Sender>,
}
