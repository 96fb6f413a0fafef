//! ClientRepository trait definition.
//!
//! Covers the persistence contract the import pipeline consumes: duplicate
//! lookup by normalized phone and the transactional per-contact write.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use uuid::Uuid;

use leadflow_types::client::{Client, OrganizationSummary, ParsedClientData};
use leadflow_types::error::RepositoryError;
use leadflow_types::import::PersistOutcome;

/// Repository trait for client records and their conversations.
pub trait ClientRepository: Send + Sync {
    /// Look up a client by normalized E.164 phone within an organization.
    fn find_by_phone(
        &self,
        organization_id: &Uuid,
        phone: &str,
    ) -> impl std::future::Future<Output = Result<Option<Client>, RepositoryError>> + Send;

    /// Persist one parsed contact inside a single transaction: client
    /// upsert by phone, conversation find-or-create for the import channel,
    /// message batch insert skipping conflicts on source message id.
    ///
    /// `existing_client_id` is the duplicate-detector's match, when any; the
    /// implementation updates that row instead of inserting a new client.
    fn persist_import(
        &self,
        organization_id: &Uuid,
        record: &ParsedClientData,
        existing_client_id: Option<Uuid>,
    ) -> impl std::future::Future<Output = Result<PersistOutcome, RepositoryError>> + Send;

    /// Per-organization record counts, for the status dashboard.
    fn organization_summaries(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<OrganizationSummary>, RepositoryError>> + Send;
}
