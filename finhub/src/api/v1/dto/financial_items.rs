//! Financial item and highlight DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{self, BillingCycle, Sentiment};
use crate::services::FinancialItemWithContext;

/// A context highlight as returned inside a financial item.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContextHighlightResponse {
    pub highlight_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_keyword: Option<String>,
    pub highlight_text: String,
    /// Matched indicator phrase, or `general_context` for a synthesized summary.
    pub indicator_keyword: String,
    pub sentiment: Sentiment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_email_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_email_message_id: Option<String>,
    /// Set only when the highlight was linked at ingestion time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_item_id: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<models::ContextHighlight> for ContextHighlightResponse {
    fn from(h: models::ContextHighlight) -> Self {
        Self {
            highlight_id: h.id,
            product_keyword: h.product_keyword,
            highlight_text: h.highlight_text,
            indicator_keyword: h.indicator_keyword,
            sentiment: h.sentiment,
            source_email_subject: h.source_email_subject,
            source_email_message_id: h.source_email_message_id,
            financial_item_id: h.financial_item_id,
            created_at: h.created_at,
        }
    }
}

/// Response item for `GET /v1/owners/{ownerEmail}/financial-items`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialItemResponse {
    /// Unique item ID (nanoid, 21 chars).
    pub item_id: String,
    pub owner_email: String,
    pub vendor_name: String,
    pub product_name: Option<String>,
    /// Amount as written in the email.
    pub original_amount: Option<f64>,
    pub original_currency: Option<String>,
    /// Amount converted into the display currency.
    pub amount_display: Option<f64>,
    pub currency_display: Option<String>,
    /// The source currency was unknown and assumed to be the display currency.
    pub amount_is_approximate: bool,
    #[schema(value_type = Option<String>)]
    pub purchase_date: Option<DateTime<Utc>>,
    pub billing_cycle: BillingCycle,
    pub category: String,
    pub raw_email_subject: Option<String>,
    pub source_email_message_id: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    pub context_highlights: Vec<ContextHighlightResponse>,
}

impl From<FinancialItemWithContext> for FinancialItemResponse {
    fn from(entry: FinancialItemWithContext) -> Self {
        let item = entry.item;
        Self {
            item_id: item.id,
            owner_email: item.owner_email,
            vendor_name: item.vendor_name,
            product_name: item.product_name,
            original_amount: item.original_amount,
            original_currency: item.original_currency,
            amount_display: item.amount_display,
            currency_display: item.currency_display,
            amount_is_approximate: item.amount_is_approximate,
            purchase_date: item.purchase_date,
            billing_cycle: item.billing_cycle,
            category: item.category,
            raw_email_subject: item.raw_email_subject,
            source_email_message_id: item.source_email_message_id,
            created_at: item.created_at,
            context_highlights: entry
                .context_highlights
                .into_iter()
                .map(ContextHighlightResponse::from)
                .collect(),
        }
    }
}

/// Response for `GET /v1/owners/{ownerEmail}/financial-items`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListFinancialItemsResponse {
    pub financial_items: Vec<FinancialItemResponse>,
}

/// Response for `DELETE /v1/owners/{ownerEmail}/financial-items/{itemId}`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFinancialItemResponse {
    pub item_id: String,
    pub deleted: bool,
}
