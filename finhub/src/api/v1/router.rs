use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;

pub fn v1_router() -> Router<AppState> {
    let owners = Router::new()
        .route(
            "/{ownerEmail}/financial-items",
            get(handlers::financial_items::list_financial_items),
        )
        .route(
            "/{ownerEmail}/financial-items/{itemId}",
            delete(handlers::financial_items::delete_financial_item),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
        .route(
            "/webhooks/email-inbound",
            post(handlers::webhook::email_inbound),
        )
        .nest("/owners", owners)
}
