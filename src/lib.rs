//! Split Bot gateway - Telegram bot that reads receipts and answers messages
//!
//! A photo or document sent to the bot is run through OCR and the extracted
//! text is sent back. Plain text is echoed, or answered by an LLM when one is
//! configured.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │        Telegram  ──POST /telegram/webhook──▶  api     │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ spawn per update
//! ┌──────────────────────────▼───────────────────────────┐
//! │                       pipeline                        │
//! │   normalize  ─▶  respond  ─▶  deliver                │
//! └───────┬───────────────┬──────────────────┬───────────┘
//!         │               │                  │
//!       ocr            agent             channels
//!   (Mistral OCR)  (OpenAI-compatible)   (Bot API)
//! ```

pub mod agent;
pub mod api;
pub mod channels;
pub mod config;
pub mod error;
pub mod ocr;
pub mod pipeline;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{Delivery, Pipeline};
