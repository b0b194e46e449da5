use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{ContextHighlight, Sentiment};

use super::{format_timestamp, parse_timestamp};

pub struct HighlightRepository;

impl HighlightRepository {
    pub async fn insert(conn: &Connection, highlight: &ContextHighlight) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO context_highlights (
                id, owner_email, product_keyword, highlight_text, indicator_keyword,
                sentiment, source_email_subject, source_email_message_id,
                financial_item_id, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10
            )
            "#,
            params![
                highlight.id.clone(),
                highlight.owner_email.clone(),
                highlight.product_keyword.clone(),
                highlight.highlight_text.clone(),
                highlight.indicator_keyword.clone(),
                highlight.sentiment.to_string(),
                highlight.source_email_subject.clone(),
                highlight.source_email_message_id.clone(),
                highlight.financial_item_id.clone(),
                format_timestamp(&highlight.created_at),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn list_by_owner(
        conn: &Connection,
        owner_email: &str,
    ) -> Result<Vec<ContextHighlight>> {
        let mut rows = conn
            .query(
                r#"
                SELECT id, owner_email, product_keyword, highlight_text, indicator_keyword,
                       sentiment, source_email_subject, source_email_message_id,
                       financial_item_id, created_at
                FROM context_highlights
                WHERE owner_email = ?1
                ORDER BY created_at DESC
                "#,
                params![owner_email],
            )
            .await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_highlight(&row)?);
        }

        Ok(results)
    }

    fn row_to_highlight(row: &libsql::Row) -> Result<ContextHighlight> {
        let sentiment: String = row.get(5)?;
        let created_at: String = row.get(9)?;

        Ok(ContextHighlight {
            id: row.get(0)?,
            owner_email: row.get(1)?,
            product_keyword: row.get(2)?,
            highlight_text: row.get(3)?,
            indicator_keyword: row.get(4)?,
            sentiment: sentiment.parse().unwrap_or(Sentiment::Neutral),
            source_email_subject: row.get(6)?,
            source_email_message_id: row.get(7)?,
            financial_item_id: row.get(8)?,
            created_at: parse_timestamp(&created_at).unwrap_or_else(chrono::Utc::now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::init_schema;
    use crate::models::HighlightCandidate;

    async fn setup_test_db() -> Connection {
        let conn = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .unwrap()
            .connect()
            .unwrap();
        init_schema(&conn).await.unwrap();
        conn
    }

    fn highlight(owner: &str, text: &str) -> ContextHighlight {
        ContextHighlight::from_candidate(
            HighlightCandidate {
                product_keyword: Some("Zoom".to_string()),
                highlight_text: text.to_string(),
                indicator_keyword: "because".to_string(),
                sentiment: Sentiment::Positive,
            },
            owner,
            Some("Zoom renewal"),
            Some("m1"),
            None,
        )
    }

    #[tokio::test]
    async fn test_insert_and_list_by_owner() {
        let conn = setup_test_db().await;
        let mine = highlight("u@x.com", "We kept Zoom because calls are stable.");
        let theirs = highlight("v@x.com", "They kept Zoom because of the price.");

        HighlightRepository::insert(&conn, &mine).await.unwrap();
        HighlightRepository::insert(&conn, &theirs).await.unwrap();

        let listed = HighlightRepository::list_by_owner(&conn, "u@x.com")
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);
        assert_eq!(listed[0].sentiment, Sentiment::Positive);
        assert_eq!(listed[0].source_email_subject.as_deref(), Some("Zoom renewal"));
    }

    #[tokio::test]
    async fn test_same_text_is_not_deduplicated() {
        let conn = setup_test_db().await;
        HighlightRepository::insert(&conn, &highlight("u@x.com", "Same sentence because reasons."))
            .await
            .unwrap();
        HighlightRepository::insert(&conn, &highlight("u@x.com", "Same sentence because reasons."))
            .await
            .unwrap();

        let listed = HighlightRepository::list_by_owner(&conn, "u@x.com")
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
    }
}
