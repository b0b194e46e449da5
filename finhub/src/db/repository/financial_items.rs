use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{BillingCycle, FinancialItem};

use super::{format_timestamp, parse_timestamp};

pub struct FinancialItemRepository;

const ITEM_COLUMNS: &str = r#"
    id, owner_email, vendor_name, product_name, original_amount, original_currency,
    amount_display, currency_display, amount_is_approximate, purchase_date,
    billing_cycle, category, raw_email_subject, source_email_message_id, created_at
"#;

impl FinancialItemRepository {
    /// Insert unless an item with the same (owner, message id) exists.
    /// Returns `false` when the row was absorbed by the uniqueness constraint.
    pub async fn insert_if_absent(conn: &Connection, item: &FinancialItem) -> Result<bool> {
        let affected = conn
            .execute(
                r#"
                INSERT INTO financial_items (
                    id, owner_email, vendor_name, product_name, original_amount,
                    original_currency, amount_display, currency_display,
                    amount_is_approximate, purchase_date, billing_cycle, category,
                    raw_email_subject, source_email_message_id, created_at
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15
                )
                ON CONFLICT(owner_email, source_email_message_id) DO NOTHING
                "#,
                params![
                    item.id.clone(),
                    item.owner_email.clone(),
                    item.vendor_name.clone(),
                    item.product_name.clone(),
                    item.original_amount,
                    item.original_currency.clone(),
                    item.amount_display,
                    item.currency_display.clone(),
                    item.amount_is_approximate as i64,
                    item.purchase_date.as_ref().map(format_timestamp),
                    item.billing_cycle.to_string(),
                    item.category.clone(),
                    item.raw_email_subject.clone(),
                    item.source_email_message_id.clone(),
                    format_timestamp(&item.created_at),
                ],
            )
            .await?;

        Ok(affected > 0)
    }

    pub async fn get_by_message_id(
        conn: &Connection,
        owner_email: &str,
        message_id: &str,
    ) -> Result<Option<FinancialItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM financial_items WHERE owner_email = ?1 AND source_email_message_id = ?2"
        );
        let mut rows = conn.query(&sql, params![owner_email, message_id]).await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_item(&row)?)),
            None => Ok(None),
        }
    }

    /// Most recent item of the owner whose vendor or product name contains `keyword`.
    ///
    /// Matching runs on decoded rows with [`FinancialItem::mentions`]; SQLite's
    /// `LOWER`/`LIKE` only fold ASCII.
    pub async fn find_latest_by_keyword(
        conn: &Connection,
        owner_email: &str,
        keyword: &str,
    ) -> Result<Option<FinancialItem>> {
        if keyword.trim().is_empty() {
            return Ok(None);
        }
        let sql = format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM financial_items
            WHERE owner_email = ?1
            ORDER BY purchase_date DESC, created_at DESC
            "#
        );
        let mut rows = conn.query(&sql, params![owner_email]).await?;

        while let Some(row) = rows.next().await? {
            let item = Self::row_to_item(&row)?;
            if item.mentions(keyword) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    pub async fn list_by_owner(conn: &Connection, owner_email: &str) -> Result<Vec<FinancialItem>> {
        let sql = format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM financial_items
            WHERE owner_email = ?1
            ORDER BY purchase_date DESC, created_at DESC
            "#
        );
        let mut rows = conn.query(&sql, params![owner_email]).await?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(Self::row_to_item(&row)?);
        }

        Ok(items)
    }

    pub async fn delete(conn: &Connection, owner_email: &str, id: &str) -> Result<bool> {
        let affected = conn
            .execute(
                "DELETE FROM financial_items WHERE owner_email = ?1 AND id = ?2",
                params![owner_email, id],
            )
            .await?;

        Ok(affected > 0)
    }

    fn row_to_item(row: &libsql::Row) -> Result<FinancialItem> {
        let billing_cycle: String = row.get(10)?;
        let created_at: String = row.get(14)?;

        Ok(FinancialItem {
            id: row.get(0)?,
            owner_email: row.get(1)?,
            vendor_name: row.get(2)?,
            product_name: row.get(3)?,
            original_amount: row.get(4)?,
            original_currency: row.get(5)?,
            amount_display: row.get(6)?,
            currency_display: row.get(7)?,
            amount_is_approximate: row.get::<i64>(8)? != 0,
            purchase_date: row
                .get::<Option<String>>(9)?
                .as_deref()
                .and_then(parse_timestamp),
            billing_cycle: billing_cycle.parse().unwrap_or(BillingCycle::Unknown),
            category: row.get(11)?,
            raw_email_subject: row.get(12)?,
            source_email_message_id: row.get(13)?,
            created_at: parse_timestamp(&created_at).unwrap_or_else(chrono::Utc::now),
        })
    }
}
