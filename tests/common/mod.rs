//! Shared test utilities

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use splitbot_gateway::agent::Conversational;
use splitbot_gateway::channels::Transport;
use splitbot_gateway::ocr::{ExtractionOutcome, TextExtractor};
use splitbot_gateway::{Error, Pipeline, Result};

/// A reply the fake transport was asked to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    pub correlation_id: String,
    pub chat_id: i64,
    pub text: String,
}

/// In-memory transport that resolves `file_id`s to fixed URLs and records replies
#[derive(Default)]
pub struct FakeTransport {
    urls: HashMap<String, String>,
    fail_send: bool,
    resolved: Mutex<Vec<String>>,
    sent: Mutex<Vec<SentReply>>,
}

impl FakeTransport {
    /// Transport that knows the given files; unknown ids fail to resolve
    pub fn with_files(files: &[&str]) -> Self {
        Self {
            urls: files
                .iter()
                .map(|id| ((*id).to_string(), file_url(id)))
                .collect(),
            ..Self::default()
        }
    }

    /// Transport whose deliveries always fail
    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<SentReply> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait for a spawned pipeline task to deliver `count` replies
    pub async fn wait_for_sent(&self, count: usize) -> Vec<SentReply> {
        for _ in 0..200 {
            if self.sent.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.sent()
    }
}

/// URL the fake transport hands out for a file
pub fn file_url(file_id: &str) -> String {
    format!("https://files.test/{file_id}.jpg")
}

#[async_trait]
impl Transport for FakeTransport {
    async fn resolve_file_url(&self, _correlation_id: &str, file_id: &str) -> Result<String> {
        self.resolved.lock().unwrap().push(file_id.to_string());
        self.urls
            .get(file_id)
            .cloned()
            .ok_or_else(|| Error::Channel(format!("unknown file {file_id}")))
    }

    async fn send_reply(&self, correlation_id: &str, chat_id: i64, text: &str) -> Result<()> {
        if self.fail_send {
            return Err(Error::Channel("chat not found".to_string()));
        }
        self.sent.lock().unwrap().push(SentReply {
            correlation_id: correlation_id.to_string(),
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// OCR provider that returns a fixed outcome and records requested URLs
pub struct ScriptedExtractor {
    outcome: ExtractionOutcome,
    calls: Mutex<Vec<String>>,
}

impl ScriptedExtractor {
    pub fn returning(outcome: ExtractionOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextExtractor for ScriptedExtractor {
    async fn extract(&self, _correlation_id: &str, image_url: &str) -> ExtractionOutcome {
        self.calls.lock().unwrap().push(image_url.to_string());
        self.outcome.clone()
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Agent that prefixes its input, or fails
pub struct PrefixAgent {
    pub fail: bool,
}

#[async_trait]
impl Conversational for PrefixAgent {
    async fn reply(&self, _correlation_id: &str, text: &str) -> Result<String> {
        if self.fail {
            return Err(Error::Agent("upstream 502".to_string()));
        }
        Ok(format!("agent: {text}"))
    }

    fn name(&self) -> &'static str {
        "prefix"
    }
}

/// Pipeline over the given fakes without an agent
pub fn pipeline(transport: &Arc<FakeTransport>, extractor: &Arc<ScriptedExtractor>) -> Pipeline {
    Pipeline::new(transport.clone(), extractor.clone(), None)
}

/// Telegram update JSON for a plain text message
pub fn text_update(update_id: i64, chat_id: i64, text: &str) -> serde_json::Value {
    serde_json::json!({
        "update_id": update_id,
        "message": {
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": {"id": chat_id, "type": "private"},
            "from": {"id": 42, "is_bot": false, "first_name": "Ada", "username": "ada"},
            "text": text
        }
    })
}

/// Telegram update JSON for a photo message with the given variant ids
pub fn photo_update(update_id: i64, chat_id: i64, file_ids: &[&str], caption: Option<&str>) -> serde_json::Value {
    let photo: Vec<serde_json::Value> = file_ids
        .iter()
        .zip(1_u32..)
        .map(|(id, i)| {
            serde_json::json!({
                "file_id": id,
                "file_unique_id": format!("u-{id}"),
                "width": 90 * i,
                "height": 60 * i,
                "file_size": 1000 * i
            })
        })
        .collect();

    let mut update = serde_json::json!({
        "update_id": update_id,
        "message": {
            "message_id": 2,
            "date": 1_700_000_000,
            "chat": {"id": chat_id, "type": "private"},
            "from": {"id": 42, "is_bot": false, "first_name": "Ada"},
            "photo": photo
        }
    });
    if let Some(caption) = caption {
        update["message"]["caption"] = serde_json::json!(caption);
    }
    update
}
