//! Inbound email webhook DTOs.

use serde::Serialize;

use crate::ingest::{IngestOutcome, ProcessedDelivery, SkipReason};

/// Whether the delivery produced any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryStatus {
    Processed,
    Ignored,
}

/// Response for `POST /v1/webhooks/email-inbound`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InboundEmailResponse {
    pub status: DeliveryStatus,
    /// Why the delivery was ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<ProcessedDelivery>,
}

impl From<IngestOutcome> for InboundEmailResponse {
    fn from(outcome: IngestOutcome) -> Self {
        match outcome {
            IngestOutcome::Ignored(reason) => Self {
                status: DeliveryStatus::Ignored,
                reason: Some(reason),
                delivery: None,
            },
            IngestOutcome::Processed(delivery) => Self {
                status: DeliveryStatus::Processed,
                reason: None,
                delivery: Some(delivery),
            },
        }
    }
}
