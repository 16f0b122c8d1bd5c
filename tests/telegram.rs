//! Pipeline tests over the real Telegram adapter against a mock Bot API

use std::sync::Arc;

use secrecy::SecretString;
use splitbot_gateway::channels::TelegramChannel;
use splitbot_gateway::config::file::SplitbotConfigFile;
use splitbot_gateway::config::{Config, TelegramConfig};
use splitbot_gateway::{Delivery, Pipeline};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{ScriptedExtractor, photo_update};

fn telegram(server: &MockServer) -> Arc<TelegramChannel> {
    let config = TelegramConfig {
        api_base: server.uri(),
        ..Config::from_sources(|_| None, SplitbotConfigFile::default()).telegram
    };
    Arc::new(TelegramChannel::new(&SecretString::from("42:tok".to_string()), &config).unwrap())
}

async fn mount_get_file(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/bot42:tok/getFile"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"ok":true,"result":{"file_id":"p","file_path":"photos/p.jpg"}}"#,
        ))
        .mount(server)
        .await;
}

fn long_receipt() -> Arc<ScriptedExtractor> {
    Arc::new(ScriptedExtractor::returning(Ok("x".repeat(9000))))
}

#[tokio::test]
async fn long_reply_interrupted_after_first_message_is_delivered() {
    let server = MockServer::start().await;
    mount_get_file(&server).await;

    Mock::given(method("POST"))
        .and(path("/bot42:tok/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true,"result":{}}"#))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bot42:tok/sendMessage"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"ok":false}"#))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(telegram(&server), long_receipt(), None);
    let delivery = pipeline
        .process("c-1", serde_json::from_value(photo_update(1, 7, &["p"], None)).unwrap())
        .await
        .unwrap();

    assert_eq!(delivery, Delivery::Replied { chat_id: 7 });
}

#[tokio::test]
async fn long_reply_rejected_outright_is_an_error() {
    let server = MockServer::start().await;
    mount_get_file(&server).await;

    Mock::given(method("POST"))
        .and(path("/bot42:tok/sendMessage"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"{"ok":false,"description":"Forbidden: bot was blocked by the user"}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(telegram(&server), long_receipt(), None);
    let result = pipeline
        .process("c-2", serde_json::from_value(photo_update(2, 7, &["p"], None)).unwrap())
        .await;

    assert!(result.is_err());
}
