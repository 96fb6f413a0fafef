//! Session store service with the two-phase staging protocol.
//!
//! The browser-automation layer never touches persistent storage directly:
//! it writes a local staging artifact which `commit` reads, persists through
//! the repository, and removes. `restore` is the inverse: extract from the
//! repository into a staging file the automation layer can load.

use std::path::PathBuf;

use uuid::Uuid;

use leadflow_types::error::SessionStoreError;
use leadflow_types::session::SessionArtifact;

use crate::repository::session::SessionArtifactRepository;

/// Session artifact store keyed by organization.
///
/// `staging_root` is an injected, cleanable directory; callers own its
/// lifecycle (see `StagingDir` in leadflow-infra).
pub struct SessionStore<R: SessionArtifactRepository> {
    repository: R,
    staging_root: PathBuf,
}

impl<R: SessionArtifactRepository> SessionStore<R> {
    pub fn new(repository: R, staging_root: PathBuf) -> Self {
        Self {
            repository,
            staging_root,
        }
    }

    /// Path of the staging artifact for an organization.
    pub fn staged_path(&self, organization_id: &Uuid) -> PathBuf {
        self.staging_root.join(format!("{organization_id}.session"))
    }

    /// True iff an active artifact exists for the organization.
    pub async fn exists(&self, organization_id: &Uuid) -> Result<bool, SessionStoreError> {
        self.repository.exists(organization_id).await
    }

    /// Persist a payload directly (the snapshot-loop path).
    pub async fn save_bytes(
        &self,
        organization_id: &Uuid,
        payload: &[u8],
    ) -> Result<(), SessionStoreError> {
        self.repository.save(organization_id, payload).await
    }

    /// Return the stored payload.
    pub async fn extract(&self, organization_id: &Uuid) -> Result<Vec<u8>, SessionStoreError> {
        self.repository.extract(organization_id).await
    }

    /// Soft-invalidate the stored payload.
    pub async fn clear(&self, organization_id: &Uuid) -> Result<(), SessionStoreError> {
        self.repository.clear(organization_id).await
    }

    /// Fetch the artifact row with metadata, if present.
    pub async fn artifact(
        &self,
        organization_id: &Uuid,
    ) -> Result<Option<SessionArtifact>, SessionStoreError> {
        self.repository.get(organization_id).await
    }

    /// Phase one: write a payload to the staging directory.
    pub async fn stage(
        &self,
        organization_id: &Uuid,
        payload: &[u8],
    ) -> Result<PathBuf, SessionStoreError> {
        let path = self.staged_path(organization_id);
        tokio::fs::create_dir_all(&self.staging_root)
            .await
            .map_err(|e| SessionStoreError::Staging(e.to_string()))?;
        tokio::fs::write(&path, payload)
            .await
            .map_err(|e| SessionStoreError::Staging(e.to_string()))?;
        Ok(path)
    }

    /// Phase two: read the staged artifact, persist it, and remove the
    /// staging file after a successful save.
    pub async fn commit(&self, organization_id: &Uuid) -> Result<(), SessionStoreError> {
        let path = self.staged_path(organization_id);
        let payload = tokio::fs::read(&path)
            .await
            .map_err(|e| SessionStoreError::Staging(e.to_string()))?;

        self.repository.save(organization_id, &payload).await?;

        if let Err(error) = tokio::fs::remove_file(&path).await {
            // The artifact is already persisted; a leftover staging file is
            // only a hygiene issue.
            tracing::warn!(%error, path = %path.display(), "failed to remove staged session artifact");
        }
        Ok(())
    }

    /// Extract the stored payload into a staging file for the automation
    /// layer to load. Fails with `NotFound` when no active artifact exists,
    /// forcing a fresh interactive login.
    pub async fn restore(&self, organization_id: &Uuid) -> Result<PathBuf, SessionStoreError> {
        let payload = self.repository.extract(organization_id).await?;

        tokio::fs::create_dir_all(&self.staging_root)
            .await
            .map_err(|e| SessionStoreError::Staging(e.to_string()))?;
        let path = self.staged_path(organization_id);
        tokio::fs::write(&path, &payload)
            .await
            .map_err(|e| SessionStoreError::Staging(e.to_string()))?;
        Ok(path)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use leadflow_types::session::SessionArtifactStatus;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// In-memory repository used by store and snapshot-loop tests.
    #[derive(Clone, Default)]
    pub(crate) struct MemorySessionRepository {
        pub rows: Arc<Mutex<HashMap<Uuid, SessionArtifact>>>,
        pub save_count: Arc<Mutex<u32>>,
        pub fail_saves: Arc<Mutex<bool>>,
    }

    impl SessionArtifactRepository for MemorySessionRepository {
        async fn exists(&self, organization_id: &Uuid) -> Result<bool, SessionStoreError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .get(organization_id)
                .is_some_and(|a| a.status == SessionArtifactStatus::Active))
        }

        async fn save(
            &self,
            organization_id: &Uuid,
            payload: &[u8],
        ) -> Result<(), SessionStoreError> {
            if *self.fail_saves.lock().unwrap() {
                return Err(SessionStoreError::Storage("simulated outage".to_string()));
            }
            *self.save_count.lock().unwrap() += 1;
            self.rows.lock().unwrap().insert(
                *organization_id,
                SessionArtifact {
                    organization_id: *organization_id,
                    payload: payload.to_vec(),
                    status: SessionArtifactStatus::Active,
                    updated_at: Utc::now(),
                },
            );
            Ok(())
        }

        async fn extract(&self, organization_id: &Uuid) -> Result<Vec<u8>, SessionStoreError> {
            let rows = self.rows.lock().unwrap();
            match rows.get(organization_id) {
                Some(artifact) if artifact.status == SessionArtifactStatus::Active => {
                    Ok(artifact.payload.clone())
                }
                _ => Err(SessionStoreError::NotFound),
            }
        }

        async fn clear(&self, organization_id: &Uuid) -> Result<(), SessionStoreError> {
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(organization_id) {
                Some(artifact) => {
                    artifact.payload.clear();
                    artifact.status = SessionArtifactStatus::Cleared;
                    artifact.updated_at = Utc::now();
                    Ok(())
                }
                None => Err(SessionStoreError::NotFound),
            }
        }

        async fn get(
            &self,
            organization_id: &Uuid,
        ) -> Result<Option<SessionArtifact>, SessionStoreError> {
            Ok(self.rows.lock().unwrap().get(organization_id).cloned())
        }
    }

    fn store_with_tempdir() -> (SessionStore<MemorySessionRepository>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let repo = MemorySessionRepository::default();
        let store = SessionStore::new(repo, dir.path().to_path_buf());
        (store, dir)
    }

    #[tokio::test]
    async fn test_save_extract_roundtrip_is_byte_identical() {
        let (store, _dir) = store_with_tempdir();
        let org = Uuid::now_v7();
        let payload: Vec<u8> = (0..=255).collect();

        store.save_bytes(&org, &payload).await.unwrap();
        let extracted = store.extract(&org).await.unwrap();
        assert_eq!(extracted, payload);
    }

    #[tokio::test]
    async fn test_extract_missing_is_not_found() {
        let (store, _dir) = store_with_tempdir();
        let err = store.extract(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, SessionStoreError::NotFound));
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_payload() {
        let (store, _dir) = store_with_tempdir();
        let org = Uuid::now_v7();

        store.save_bytes(&org, b"first snapshot").await.unwrap();
        store.save_bytes(&org, b"second").await.unwrap();

        assert_eq!(store.extract(&org).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_clear_soft_invalidates() {
        let (store, _dir) = store_with_tempdir();
        let org = Uuid::now_v7();

        store.save_bytes(&org, b"payload").await.unwrap();
        store.clear(&org).await.unwrap();

        assert!(!store.exists(&org).await.unwrap());
        assert!(matches!(
            store.extract(&org).await.unwrap_err(),
            SessionStoreError::NotFound
        ));
        // The row survives for re-authentication.
        assert!(store.artifact(&org).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stage_commit_persists_and_removes_staging_file() {
        let (store, _dir) = store_with_tempdir();
        let org = Uuid::now_v7();

        let path = store.stage(&org, b"staged bytes").await.unwrap();
        assert!(path.exists());

        store.commit(&org).await.unwrap();
        assert!(!path.exists());
        assert_eq!(store.extract(&org).await.unwrap(), b"staged bytes");
    }

    #[tokio::test]
    async fn test_commit_without_staged_file_fails() {
        let (store, _dir) = store_with_tempdir();
        let err = store.commit(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, SessionStoreError::Staging(_)));
    }

    #[tokio::test]
    async fn test_restore_writes_staging_file() {
        let (store, _dir) = store_with_tempdir();
        let org = Uuid::now_v7();

        store.save_bytes(&org, b"login state").await.unwrap();
        let path = store.restore(&org).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"login state");
    }

    #[tokio::test]
    async fn test_restore_missing_fails_not_found() {
        let (store, _dir) = store_with_tempdir();
        let err = store.restore(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, SessionStoreError::NotFound));
    }
}
