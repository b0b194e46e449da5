use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{CurrencyConfig, IngestConfig};
use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::ContextHighlight;

use super::classifier::classify;
use super::highlights::HighlightExtractor;
use super::intake::{self, InboundEmail};
use super::lexicon::HighlightTables;
use super::linker::EntityLinker;
use super::normalizer::FactNormalizer;
use super::oracle::{Fact, FactOracle};
use super::writer::{PersistenceWriter, WriteReport, WrittenItem};
use super::{SkipReason, Stage};

/// What happened to one webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// Acknowledged without touching storage.
    Ignored(SkipReason),
    Processed(ProcessedDelivery),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDelivery {
    pub owner_email: String,
    pub financial_item_id: Option<String>,
    /// The item already existed for this (owner, message id).
    pub duplicate: bool,
    /// Why no item was produced, when none was.
    pub extraction_skipped: Option<SkipReason>,
    pub highlights_saved: usize,
    pub highlights_failed: usize,
    pub highlights_linked: usize,
}

pub struct IngestPipeline {
    store: Arc<dyn DatabaseBackend>,
    oracle: Arc<dyn FactOracle>,
    writer: PersistenceWriter,
    normalizer: FactNormalizer,
    extractor: HighlightExtractor,
    oracle_timeout: Duration,
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn DatabaseBackend>,
        oracle: Arc<dyn FactOracle>,
        currency: &CurrencyConfig,
        ingest: &IngestConfig,
    ) -> Self {
        Self {
            writer: PersistenceWriter::new(store.clone()),
            store,
            oracle,
            normalizer: FactNormalizer::new(currency),
            extractor: HighlightExtractor::default(),
            oracle_timeout: Duration::from_secs(ingest.oracle_timeout_secs),
        }
    }

    pub fn with_highlight_tables(mut self, tables: HighlightTables) -> Self {
        self.extractor = HighlightExtractor::new(tables);
        self
    }

    /// Run one delivery to completion. `Err` is reserved for faults the
    /// upstream provider should retry.
    pub async fn process(&self, raw: &[u8]) -> Result<IngestOutcome> {
        let delivery_id = Uuid::new_v4();
        let span = tracing::info_span!("ingest", %delivery_id, owner = tracing::field::Empty);
        self.run(raw).instrument(span).await
    }

    async fn run(&self, raw: &[u8]) -> Result<IngestOutcome> {
        let email = match intake::normalize(raw) {
            Stage::Ready(email) => email,
            Stage::Skip(reason) => {
                tracing::info!(%reason, "Ignoring inbound email");
                return Ok(IngestOutcome::Ignored(reason));
            }
        };
        tracing::Span::current().record("owner", email.owner.as_str());

        let written = match self.extract_fact(&email).await {
            Stage::Ready(fact) => {
                let item = self.normalizer.normalize(fact, &email, Utc::now());
                Stage::Ready(self.writer.write_item(item).await?)
            }
            Stage::Skip(reason) => {
                tracing::info!(%reason, "No financial item for this email");
                Stage::Skip(reason)
            }
        };
        let extraction_skipped = written.skip_reason();
        let written = written.ready();

        let report = self.save_highlights(&email, written.as_ref()).await;

        let delivery = ProcessedDelivery {
            owner_email: email.owner,
            financial_item_id: written.as_ref().map(|w| w.item.id.clone()),
            duplicate: written.as_ref().is_some_and(|w| w.duplicate),
            extraction_skipped,
            highlights_saved: report.saved,
            highlights_failed: report.failed,
            highlights_linked: report.linked,
        };
        tracing::info!(
            financial_item_id = ?delivery.financial_item_id,
            duplicate = delivery.duplicate,
            highlights_saved = report.saved,
            highlights_failed = report.failed,
            highlights_linked = report.linked,
            "Inbound email processed"
        );
        Ok(IngestOutcome::Processed(delivery))
    }

    async fn extract_fact(&self, email: &InboundEmail) -> Stage<Fact> {
        if !self.oracle.is_available() {
            tracing::debug!("No extraction oracle configured");
            return Stage::Skip(SkipReason::NotFinancial);
        }
        let Some(signal) = classify(email) else {
            return Stage::Skip(SkipReason::NotFinancial);
        };
        tracing::debug!(?signal, "Email classified as financial");

        let call = self.oracle.extract(email.subject_or_empty(), &email.body);
        let raw = match tokio::time::timeout(self.oracle_timeout, call).await {
            Ok(Ok(Some(raw))) => raw,
            Ok(Ok(None)) => return Stage::Skip(SkipReason::ExtractionIncomplete),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Extraction oracle failed");
                return Stage::Skip(SkipReason::ExtractionFailed);
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.oracle_timeout.as_secs(),
                    "Extraction oracle timed out"
                );
                return Stage::Skip(SkipReason::ExtractionFailed);
            }
        };

        match raw.validate() {
            Some(fact) => Stage::Ready(fact),
            None => {
                tracing::warn!("Extraction lacked a usable vendor or amount");
                Stage::Skip(SkipReason::ExtractionIncomplete)
            }
        }
    }

    async fn save_highlights(
        &self,
        email: &InboundEmail,
        written: Option<&WrittenItem>,
    ) -> WriteReport {
        let candidates = self.extractor.extract(email.subject_or_empty(), &email.body);
        if candidates.is_empty() {
            return WriteReport::default();
        }

        let mut linker = EntityLinker::new(
            self.store.clone(),
            &email.owner,
            written.map(|w| &w.item),
        );
        let mut highlights = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let financial_item_id = linker.link(&candidate).await;
            highlights.push(ContextHighlight::from_candidate(
                candidate,
                &email.owner,
                email.subject.as_deref(),
                email.message_id.as_deref(),
                financial_item_id,
            ));
        }

        self.writer.write_highlights(&highlights).await
    }
}
