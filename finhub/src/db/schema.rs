use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Detected transactions
        CREATE TABLE IF NOT EXISTS financial_items (
            id TEXT PRIMARY KEY,
            owner_email TEXT NOT NULL,
            vendor_name TEXT NOT NULL,
            product_name TEXT,
            original_amount REAL,
            original_currency TEXT,
            amount_display REAL,
            currency_display TEXT,
            amount_is_approximate INTEGER NOT NULL DEFAULT 0,
            purchase_date TEXT,
            billing_cycle TEXT NOT NULL DEFAULT 'unknown',
            category TEXT NOT NULL DEFAULT 'Other',
            raw_email_subject TEXT,
            source_email_message_id TEXT,
            created_at TEXT NOT NULL,
            CHECK (
                (original_amount IS NULL AND amount_display IS NULL AND currency_display IS NULL)
                OR (original_amount IS NOT NULL AND currency_display IS NOT NULL)
            )
        );

        -- Idempotency key, scoped per owner. NULL message ids never collide.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_financial_items_owner_message
            ON financial_items(owner_email, source_email_message_id);
        CREATE INDEX IF NOT EXISTS idx_financial_items_owner_purchase
            ON financial_items(owner_email, purchase_date);

        -- Mined context sentences
        CREATE TABLE IF NOT EXISTS context_highlights (
            id TEXT PRIMARY KEY,
            owner_email TEXT NOT NULL,
            product_keyword TEXT,
            highlight_text TEXT NOT NULL,
            indicator_keyword TEXT NOT NULL,
            sentiment TEXT NOT NULL DEFAULT 'neutral',
            source_email_subject TEXT,
            source_email_message_id TEXT,
            financial_item_id TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (financial_item_id) REFERENCES financial_items(id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_context_highlights_owner ON context_highlights(owner_email);
        CREATE INDEX IF NOT EXISTS idx_context_highlights_item
            ON context_highlights(financial_item_id);
        "#,
    )
    .await?;

    migrate_amount_is_approximate_column(conn).await?;

    Ok(())
}

async fn migrate_amount_is_approximate_column(conn: &Connection) -> Result<()> {
    let column_exists: bool = conn
        .query(
            "SELECT COUNT(*) FROM pragma_table_info('financial_items') WHERE name='amount_is_approximate'",
            (),
        )
        .await?
        .next()
        .await?
        .map(|row| row.get::<i64>(0).unwrap_or(0) > 0)
        .unwrap_or(false);

    if !column_exists {
        tracing::info!("Migrating financial_items table: adding amount_is_approximate column");
        conn.execute(
            "ALTER TABLE financial_items ADD COLUMN amount_is_approximate INTEGER NOT NULL DEFAULT 0",
            (),
        )
        .await?;
        tracing::info!("Migration complete: amount_is_approximate column added");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libsql::Builder;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let db = Builder::new_local(":memory:").build().await.unwrap();
        let conn = db.connect().unwrap();

        init_schema(&conn).await.unwrap();
        init_schema(&conn).await.unwrap();

        let mut rows = conn
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('financial_items', 'context_highlights') ORDER BY name",
                (),
            )
            .await
            .unwrap();

        let mut tables = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            tables.push(row.get::<String>(0).unwrap());
        }
        assert_eq!(tables, vec!["context_highlights", "financial_items"]);
    }

    #[tokio::test]
    async fn test_display_invariant_is_enforced_by_storage() {
        let db = Builder::new_local(":memory:").build().await.unwrap();
        let conn = db.connect().unwrap();
        init_schema(&conn).await.unwrap();

        let result = conn
            .execute(
                "INSERT INTO financial_items (id, owner_email, vendor_name, amount_display, created_at) VALUES ('a', 'u@x.com', 'Zoom', 10.0, '2024-01-01T00:00:00Z')",
                (),
            )
            .await;
        assert!(result.is_err(), "display amount without original amount must be rejected");

        let result = conn
            .execute(
                "INSERT INTO financial_items (id, owner_email, vendor_name, original_amount, created_at) VALUES ('b', 'u@x.com', 'Zoom', 10.0, '2024-01-01T00:00:00Z')",
                (),
            )
            .await;
        assert!(result.is_err(), "amount without display currency must be rejected");
    }

    #[tokio::test]
    async fn test_message_id_unique_per_owner() {
        let db = Builder::new_local(":memory:").build().await.unwrap();
        let conn = db.connect().unwrap();
        init_schema(&conn).await.unwrap();

        let insert = "INSERT INTO financial_items (id, owner_email, vendor_name, source_email_message_id, created_at) VALUES (?1, ?2, 'Zoom', 'm1', '2024-01-01T00:00:00Z')";
        conn.execute(insert, libsql::params!["a", "u@x.com"]).await.unwrap();
        assert!(conn.execute(insert, libsql::params!["b", "u@x.com"]).await.is_err());
        conn.execute(insert, libsql::params!["c", "other@x.com"]).await.unwrap();
    }
}
