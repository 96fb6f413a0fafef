//! Duplicate detection by normalized phone within an organization.

use uuid::Uuid;

use leadflow_types::client::ParsedClientData;
use leadflow_types::error::RepositoryError;
use leadflow_types::import::{ConflictType, DuplicateCheckResult};

use crate::repository::client::ClientRepository;

/// Check whether a record's phone already belongs to a client in the
/// organization.
///
/// A match is always a duplicate. When both the existing and the new name
/// are present and differ case-insensitively, the conflict is reported as
/// `Name` (advisory; the phone still matched); otherwise as `Phone`.
pub async fn check_duplicate<R: ClientRepository>(
    repository: &R,
    organization_id: &Uuid,
    record: &ParsedClientData,
) -> Result<DuplicateCheckResult, RepositoryError> {
    let Some(existing) = repository.find_by_phone(organization_id, &record.phone).await? else {
        return Ok(DuplicateCheckResult::not_duplicate());
    };

    let conflict_type = match (existing.name.as_deref(), record.name.as_deref()) {
        (Some(old), Some(new)) if !old.eq_ignore_ascii_case(new) => ConflictType::Name,
        _ => ConflictType::Phone,
    };

    Ok(DuplicateCheckResult {
        is_duplicate: true,
        existing_client_id: Some(existing.id),
        conflict_type: Some(conflict_type),
    })
}
