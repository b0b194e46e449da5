//! v1 financial item handlers.

use axum::extract::{Path, State};

use crate::api::v1::dto::{
    DeleteFinancialItemResponse, FinancialItemResponse, ListFinancialItemsResponse,
};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;

/// `GET /api/v1/owners/{ownerEmail}/financial-items`
#[utoipa::path(
    get,
    path = "/api/v1/owners/{ownerEmail}/financial-items",
    tag = "financial-items",
    operation_id = "financialItems.list",
    params(("ownerEmail" = String, Path, description = "Owner email address (case-insensitive)")),
    responses(
        (status = 200, description = "Items newest first with context highlights", body = ListFinancialItemsResponse),
        (status = 400, description = "Invalid owner", body = ApiError),
    )
)]
pub async fn list_financial_items(
    State(state): State<AppState>,
    Path(owner_email): Path<String>,
) -> ApiResponse<ListFinancialItemsResponse> {
    match state.items.list_with_context(&owner_email).await {
        Ok(items) => {
            let total = items.len() as u64;
            let financial_items = items.into_iter().map(FinancialItemResponse::from).collect();
            ApiResponse::success_with_meta(
                ListFinancialItemsResponse { financial_items },
                ResponseMeta { total },
            )
        }
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/owners/{ownerEmail}/financial-items/{itemId}`
///
/// Linked highlights are kept and become unlinked.
#[utoipa::path(
    delete,
    path = "/api/v1/owners/{ownerEmail}/financial-items/{itemId}",
    tag = "financial-items",
    operation_id = "financialItems.delete",
    params(
        ("ownerEmail" = String, Path, description = "Owner email address"),
        ("itemId" = String, Path, description = "Financial item ID"),
    ),
    responses(
        (status = 200, description = "Item deleted", body = DeleteFinancialItemResponse),
        (status = 404, description = "Item not found", body = ApiError),
    )
)]
pub async fn delete_financial_item(
    State(state): State<AppState>,
    Path((owner_email, item_id)): Path<(String, String)>,
) -> ApiResponse<DeleteFinancialItemResponse> {
    match state.items.delete(&owner_email, &item_id).await {
        Ok(()) => ApiResponse::success(DeleteFinancialItemResponse {
            item_id,
            deleted: true,
        }),
        Err(e) => e.into(),
    }
}
