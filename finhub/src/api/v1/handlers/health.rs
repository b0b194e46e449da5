use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;
use crate::config::parse_llm_provider_model;

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub extraction: ExtractionStatus,
    pub display_currency: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ExtractionStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let database = match state.db.sync().await {
        Ok(_) => DatabaseStatus {
            status: "ok".to_string(),
        },
        Err(_) => DatabaseStatus {
            status: "error".to_string(),
        },
    };

    let extraction = match (&state.config.llm, state.oracle.is_available()) {
        (Some(llm), true) => {
            let (provider, model) = parse_llm_provider_model(&llm.model);
            ExtractionStatus {
                status: "available".to_string(),
                provider: Some(provider.to_string()),
                model: Some(model.to_string()),
            }
        }
        (None, true) => ExtractionStatus {
            status: "available".to_string(),
            provider: None,
            model: None,
        },
        (_, false) => ExtractionStatus {
            status: "unavailable".to_string(),
            provider: None,
            model: None,
        },
    };

    ApiResponse::success(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        extraction,
        display_currency: state.config.currency.display.clone(),
    })
}
