//! v1 inbound email webhook.

use axum::body::Bytes;
use axum::extract::State;

use crate::api::v1::dto::InboundEmailResponse;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;

/// `POST /api/v1/webhooks/email-inbound`
///
/// Accepts a Postmark-style inbound payload. Uninteresting mail is
/// acknowledged with `200`; only processing faults return an error so the
/// provider retries them.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/email-inbound",
    tag = "webhooks",
    operation_id = "webhooks.emailInbound",
    request_body(content = Object, description = "Inbound email payload", content_type = "application/json"),
    responses(
        (status = 200, description = "Delivery processed or ignored", body = InboundEmailResponse),
        (status = 500, description = "Processing fault", body = ApiError),
    )
)]
pub async fn email_inbound(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResponse<InboundEmailResponse> {
    match state.pipeline.process(&body).await {
        Ok(outcome) => ApiResponse::success(InboundEmailResponse::from(outcome)),
        Err(e) => e.into(),
    }
}
