//! SQLite session artifact repository implementation.
//!
//! One row per organization. The payload is stored base64-encoded in a
//! TEXT column; `clear` nulls the payload and flips the status but keeps
//! the row so re-authentication reuses the same key.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use leadflow_core::repository::session::SessionArtifactRepository;
use leadflow_types::error::SessionStoreError;
use leadflow_types::session::{SessionArtifact, SessionArtifactStatus};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionArtifactRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn storage_error(e: impl std::fmt::Display) -> SessionStoreError {
    SessionStoreError::Storage(e.to_string())
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SessionStoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(storage_error)
}

impl SessionArtifactRepository for SqliteSessionRepository {
    async fn exists(&self, organization_id: &Uuid) -> Result<bool, SessionStoreError> {
        let row = sqlx::query(
            "SELECT 1 FROM session_artifacts WHERE organization_id = ? AND status = 'active' AND payload IS NOT NULL",
        )
        .bind(organization_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(storage_error)?;

        Ok(row.is_some())
    }

    async fn save(&self, organization_id: &Uuid, payload: &[u8]) -> Result<(), SessionStoreError> {
        let encoded = BASE64.encode(payload);
        let now = Utc::now().to_rfc3339();

        // Last-writer-wins upsert; the payload is always written whole.
        sqlx::query(
            r#"INSERT INTO session_artifacts (organization_id, payload, status, updated_at)
               VALUES (?, ?, 'active', ?)
               ON CONFLICT (organization_id) DO UPDATE
               SET payload = excluded.payload, status = 'active', updated_at = excluded.updated_at"#,
        )
        .bind(organization_id.to_string())
        .bind(&encoded)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn extract(&self, organization_id: &Uuid) -> Result<Vec<u8>, SessionStoreError> {
        let row = sqlx::query(
            "SELECT payload FROM session_artifacts WHERE organization_id = ? AND status = 'active'",
        )
        .bind(organization_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(storage_error)?;

        let Some(row) = row else {
            return Err(SessionStoreError::NotFound);
        };
        let payload: Option<String> = row.try_get("payload").map_err(storage_error)?;
        let Some(payload) = payload else {
            return Err(SessionStoreError::NotFound);
        };

        BASE64
            .decode(payload)
            .map_err(|e| SessionStoreError::Storage(format!("corrupt payload: {e}")))
    }

    async fn clear(&self, organization_id: &Uuid) -> Result<(), SessionStoreError> {
        let result = sqlx::query(
            "UPDATE session_artifacts SET payload = NULL, status = 'cleared', updated_at = ? WHERE organization_id = ?",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(organization_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(SessionStoreError::NotFound);
        }
        Ok(())
    }

    async fn get(
        &self,
        organization_id: &Uuid,
    ) -> Result<Option<SessionArtifact>, SessionStoreError> {
        let row = sqlx::query("SELECT * FROM session_artifacts WHERE organization_id = ?")
            .bind(organization_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(storage_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: Option<String> = row.try_get("payload").map_err(storage_error)?;
        let status: String = row.try_get("status").map_err(storage_error)?;
        let updated_at: String = row.try_get("updated_at").map_err(storage_error)?;

        let payload = match payload {
            Some(encoded) => BASE64
                .decode(encoded)
                .map_err(|e| SessionStoreError::Storage(format!("corrupt payload: {e}")))?,
            None => Vec::new(),
        };

        Ok(Some(SessionArtifact {
            organization_id: *organization_id,
            payload,
            status: status
                .parse::<SessionArtifactStatus>()
                .map_err(SessionStoreError::Storage)?,
            updated_at: parse_datetime(&updated_at)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::tests::test_pool;

    #[tokio::test]
    async fn test_save_extract_roundtrip_binary() {
        let pool = test_pool().await;
        let repo = SqliteSessionRepository::new(pool);
        let org = Uuid::now_v7();

        // Arbitrary bytes, including non-UTF8 sequences.
        let payload: Vec<u8> = (0..=255).collect();
        repo.save(&org, &payload).await.unwrap();

        let extracted = repo.extract(&org).await.unwrap();
        assert_eq!(extracted, payload);
    }

    #[tokio::test]
    async fn test_exists_reflects_lifecycle() {
        let pool = test_pool().await;
        let repo = SqliteSessionRepository::new(pool);
        let org = Uuid::now_v7();

        assert!(!repo.exists(&org).await.unwrap());
        repo.save(&org, b"state").await.unwrap();
        assert!(repo.exists(&org).await.unwrap());
        repo.clear(&org).await.unwrap();
        assert!(!repo.exists(&org).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_upserts_single_row() {
        let pool = test_pool().await;
        let repo = SqliteSessionRepository::new(pool.clone());
        let org = Uuid::now_v7();

        repo.save(&org, b"first").await.unwrap();
        repo.save(&org, b"second").await.unwrap();

        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM session_artifacts WHERE organization_id = ?")
                .bind(org.to_string())
                .fetch_one(&pool.reader)
                .await
                .unwrap();
        assert_eq!(count.0, 1);
        assert_eq!(repo.extract(&org).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_extract_missing_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteSessionRepository::new(pool);

        let err = repo.extract(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, SessionStoreError::NotFound));
    }

    #[tokio::test]
    async fn test_clear_keeps_row_and_save_revives_it() {
        let pool = test_pool().await;
        let repo = SqliteSessionRepository::new(pool);
        let org = Uuid::now_v7();

        repo.save(&org, b"login").await.unwrap();
        repo.clear(&org).await.unwrap();

        // Row survives with cleared status.
        let artifact = repo.get(&org).await.unwrap().unwrap();
        assert_eq!(artifact.status, SessionArtifactStatus::Cleared);
        assert!(artifact.payload.is_empty());
        assert!(matches!(
            repo.extract(&org).await.unwrap_err(),
            SessionStoreError::NotFound
        ));

        // Re-authentication reuses the same key.
        repo.save(&org, b"fresh login").await.unwrap();
        assert_eq!(repo.extract(&org).await.unwrap(), b"fresh login");
    }

    #[tokio::test]
    async fn test_clear_missing_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteSessionRepository::new(pool);

        let err = repo.clear(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, SessionStoreError::NotFound));
    }

    #[tokio::test]
    async fn test_artifacts_isolated_per_organization() {
        let pool = test_pool().await;
        let repo = SqliteSessionRepository::new(pool);
        let org_a = Uuid::now_v7();
        let org_b = Uuid::now_v7();

        repo.save(&org_a, b"a-session").await.unwrap();
        repo.save(&org_b, b"b-session").await.unwrap();

        assert_eq!(repo.extract(&org_a).await.unwrap(), b"a-session");
        assert_eq!(repo.extract(&org_b).await.unwrap(), b"b-session");
    }
}
