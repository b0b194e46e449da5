// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;

use finhub::config::{CurrencyConfig, DatabaseConfig, IngestConfig};
use finhub::db::{Database, DatabaseBackend, LibSqlBackend};
use finhub::error::{FinhubError, Result};
use finhub::ingest::{FactOracle, IngestPipeline, RawFact};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A file-backed database in a fresh temp dir. Keep the `TempDir` alive for
/// the duration of the test.
pub async fn test_backend() -> (TempDir, Arc<dyn DatabaseBackend>) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let db = Database::new(&DatabaseConfig::local(temp_dir.path().join("finhub_test.db")))
        .await
        .expect("failed to open test database");
    (temp_dir, Arc::new(LibSqlBackend::new(db)))
}

pub fn pipeline(store: Arc<dyn DatabaseBackend>, oracle: Arc<dyn FactOracle>) -> IngestPipeline {
    IngestPipeline::new(
        store,
        oracle,
        &CurrencyConfig::default(),
        &IngestConfig {
            oracle_timeout_secs: 1,
        },
    )
}

/// Postmark-style inbound payload.
pub fn inbound(owner: &str, subject: &str, body: &str, message_id: &str) -> Vec<u8> {
    json!({
        "From": format!("Billing <{owner}>"),
        "FromFull": { "Email": owner, "Name": "Billing" },
        "Subject": subject,
        "TextBody": body,
        "Date": "Mon, 3 Jun 2024 10:00:00 +0000",
        "MessageID": message_id,
    })
    .to_string()
    .into_bytes()
}

pub fn netflix_fact() -> Value {
    json!({
        "vendor_name": "Netflix",
        "product_name": "Premium",
        "original_amount": 13.99,
        "original_currency": "EUR",
        "purchase_date": "2024-05-01",
        "billing_cycle": "monthly",
        "category": "Entertainment"
    })
}

pub enum StubReply {
    Fact(Value),
    Nothing,
    Fail,
    Hang,
}

/// Oracle with a canned answer that counts its calls.
pub struct StubOracle {
    reply: StubReply,
    calls: AtomicUsize,
}

impl StubOracle {
    pub fn new(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactOracle for StubOracle {
    async fn extract(&self, _subject: &str, _body: &str) -> Result<Option<RawFact>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StubReply::Fact(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            StubReply::Nothing => Ok(None),
            StubReply::Fail => Err(FinhubError::Llm("stub oracle failure".to_string())),
            StubReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}

/// OpenAI-style chat completion body carrying `content`.
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 10,
            "completion_tokens": 20,
            "total_tokens": 30
        }
    })
}
