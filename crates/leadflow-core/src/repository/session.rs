//! SessionArtifactRepository trait definition.
//!
//! The only sanctioned path to session artifact storage. One row per
//! organization; `save` upserts whole payloads, `clear` soft-invalidates
//! without deleting the row.

use uuid::Uuid;

use leadflow_types::error::SessionStoreError;
use leadflow_types::session::SessionArtifact;

/// Repository trait for session artifact persistence.
pub trait SessionArtifactRepository: Send + Sync {
    /// True iff an active (non-cleared) artifact exists.
    fn exists(
        &self,
        organization_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, SessionStoreError>> + Send;

    /// Upsert the artifact: create the row if absent, else overwrite the
    /// payload and `updated_at`. Whole-payload writes only.
    fn save(
        &self,
        organization_id: &Uuid,
        payload: &[u8],
    ) -> impl std::future::Future<Output = Result<(), SessionStoreError>> + Send;

    /// Return the stored payload, or `SessionStoreError::NotFound` when the
    /// row is absent or cleared.
    fn extract(
        &self,
        organization_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, SessionStoreError>> + Send;

    /// Soft-invalidate the payload, keeping the row so re-authentication
    /// reuses the same key.
    fn clear(
        &self,
        organization_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), SessionStoreError>> + Send;

    /// Fetch the artifact row with metadata, if present.
    fn get(
        &self,
        organization_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<SessionArtifact>, SessionStoreError>> + Send;
}
