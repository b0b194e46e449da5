use libsql::{Builder, Connection};
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// Shared handle to the backing store. Cloning shares the underlying database.
#[derive(Clone)]
pub struct Database {
    pub(crate) db: Arc<libsql::Database>,
    session_pragmas: Arc<str>,
    journal_mode: &'static str,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let db = if config.url.starts_with("libsql://") || config.url.starts_with("https://") {
            if let Some(ref local_path) = config.local_path {
                Builder::new_remote_replica(
                    local_path,
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            } else {
                Builder::new_remote(
                    config.url.clone(),
                    config.auth_token.clone().unwrap_or_default(),
                )
                .build()
                .await?
            }
        } else if config.url == ":memory:" {
            Builder::new_local(":memory:").build().await?
        } else {
            let path = config.url.strip_prefix("file:").unwrap_or(&config.url);
            Builder::new_local(path).build().await?
        };

        // busy_timeout, synchronous and foreign_keys are per-connection settings in SQLite.
        let session_pragmas = format!(
            "PRAGMA busy_timeout = {}; PRAGMA synchronous = {}; PRAGMA foreign_keys = ON;",
            config.busy_timeout_ms,
            normalize_synchronous(&config.synchronous),
        );

        let database = Self {
            db: Arc::new(db),
            session_pragmas: session_pragmas.into(),
            journal_mode: normalize_journal_mode(&config.journal_mode),
        };
        database.configure_journal().await;
        database.init_schema().await?;

        Ok(database)
    }

    /// Open a connection with the session pragmas applied.
    pub async fn connect(&self) -> Result<Connection> {
        let conn = self.db.connect()?;
        if let Err(error) = conn.execute_batch(&self.session_pragmas).await {
            tracing::warn!(error = %error, "Failed to apply SQLite session pragmas");
        }
        Ok(conn)
    }

    async fn configure_journal(&self) {
        let Ok(conn) = self.db.connect() else {
            return;
        };
        let journal_sql = format!("PRAGMA journal_mode = {}", self.journal_mode);
        if let Err(error) = conn.execute_batch(&journal_sql).await {
            tracing::warn!(
                mode = %self.journal_mode,
                error = %error,
                "Failed to set SQLite journal_mode"
            );
        }
    }

    async fn init_schema(&self) -> Result<()> {
        let conn = self.connect().await?;
        schema::init_schema(&conn).await?;
        Ok(())
    }

    pub async fn sync(&self) -> Result<()> {
        if let Ok(sync) = self.db.sync().await {
            tracing::info!("Database synced: {:?}", sync);
        }
        Ok(())
    }
}

fn normalize_journal_mode(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "DELETE" => "DELETE",
        "TRUNCATE" => "TRUNCATE",
        "PERSIST" => "PERSIST",
        "MEMORY" => "MEMORY",
        "WAL" => "WAL",
        "OFF" => "OFF",
        _ => "WAL",
    }
}

fn normalize_synchronous(value: &str) -> &'static str {
    match value.trim().to_uppercase().as_str() {
        "OFF" => "OFF",
        "NORMAL" => "NORMAL",
        "FULL" => "FULL",
        "EXTRA" => "EXTRA",
        _ => "NORMAL",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pragma_normalization_falls_back() {
        assert_eq!(normalize_journal_mode("delete"), "DELETE");
        assert_eq!(normalize_journal_mode("bogus"), "WAL");
        assert_eq!(normalize_synchronous(" full "), "FULL");
        assert_eq!(normalize_synchronous(""), "NORMAL");
    }

    #[tokio::test]
    async fn test_connections_enforce_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&DatabaseConfig::local(dir.path().join("fk.db")))
            .await
            .unwrap();
        let conn = db.connect().await.unwrap();

        let enabled: i64 = conn
            .query("PRAGMA foreign_keys", ())
            .await
            .unwrap()
            .next()
            .await
            .unwrap()
            .unwrap()
            .get(0)
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
