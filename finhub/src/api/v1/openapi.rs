use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "finhub API",
        version = "1.0.0",
        description = "Turns inbound email into financial items and the context around them.",
    ),
    paths(
        handlers::health::health_check,
        handlers::webhook::email_inbound,
        handlers::financial_items::list_financial_items,
        handlers::financial_items::delete_financial_item,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Webhook
        dto::webhook::DeliveryStatus,
        dto::webhook::InboundEmailResponse,
        crate::ingest::ProcessedDelivery,
        crate::ingest::SkipReason,
        // Financial items
        dto::financial_items::FinancialItemResponse,
        dto::financial_items::ContextHighlightResponse,
        dto::financial_items::ListFinancialItemsResponse,
        dto::financial_items::DeleteFinancialItemResponse,
        crate::models::BillingCycle,
        crate::models::Sentiment,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::ExtractionStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "webhooks", description = "Inbound email ingestion"),
        (name = "financial-items", description = "Financial items and their context highlights"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
