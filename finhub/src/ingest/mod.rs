//! The inbound-email ingestion pipeline.
//!
//! Each stage is a small module; [`IngestPipeline`] runs them in order for a
//! single webhook delivery.

pub mod classifier;
pub mod currency;
pub mod dates;
pub mod highlights;
pub mod intake;
pub mod lexicon;
pub mod linker;
pub mod normalizer;
pub mod oracle;
mod pipeline;
pub mod sentiment;
pub mod writer;

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

pub use highlights::HighlightExtractor;
pub use intake::InboundEmail;
pub use lexicon::HighlightTables;
pub use oracle::{Fact, FactOracle, LlmFactOracle, RawFact};
pub use pipeline::{IngestOutcome, IngestPipeline, ProcessedDelivery};
pub use writer::WriteReport;

/// Result of a stage that can legitimately decline to produce output.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage<T> {
    Ready(T),
    Skip(SkipReason),
}

impl<T> Stage<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Stage::Ready(value) => Some(value),
            Stage::Skip(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Stage::Ready(_) => None,
            Stage::Skip(reason) => Some(*reason),
        }
    }
}

/// Recoverable, non-error reasons for a stage to produce nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No owner address could be read from the payload.
    UndeterminableSender,
    /// The classifier saw no financial signal, or no oracle is configured.
    NotFinancial,
    /// The oracle errored or timed out.
    ExtractionFailed,
    /// The oracle answered without a usable vendor and amount.
    ExtractionIncomplete,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::UndeterminableSender => "undeterminable_sender",
            SkipReason::NotFinancial => "not_financial",
            SkipReason::ExtractionFailed => "extraction_failed",
            SkipReason::ExtractionIncomplete => "extraction_incomplete",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
