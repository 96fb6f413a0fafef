//! SQLite client repository implementation.
//!
//! Implements `ClientRepository` from `leadflow-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, and the per-contact
//! import transaction (client upsert, conversation find-or-create, message
//! batch insert with skip-on-conflict by source message id).

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use leadflow_core::repository::client::ClientRepository;
use leadflow_types::client::{Client, CulturalContext, OrganizationSummary, ParsedClientData, SalesStatus};
use leadflow_types::error::RepositoryError;
use leadflow_types::import::PersistOutcome;

use super::pool::DatabasePool;

/// Channel tag for conversations created by the chat-history importer.
const IMPORT_CHANNEL: &str = "chat_import";

/// SQLite-backed implementation of `ClientRepository`.
pub struct SqliteClientRepository {
    pool: DatabasePool,
}

impl SqliteClientRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ClientRow {
    id: String,
    organization_id: String,
    phone: String,
    name: Option<String>,
    preferred_language: String,
    status: String,
    cultural_context: Option<String>,
    first_contact_at: Option<String>,
    last_contact_at: Option<String>,
    metadata: String,
    created_at: String,
    updated_at: String,
}

impl ClientRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            organization_id: row.try_get("organization_id")?,
            phone: row.try_get("phone")?,
            name: row.try_get("name")?,
            preferred_language: row.try_get("preferred_language")?,
            status: row.try_get("status")?,
            cultural_context: row.try_get("cultural_context")?,
            first_contact_at: row.try_get("first_contact_at")?,
            last_contact_at: row.try_get("last_contact_at")?,
            metadata: row.try_get("metadata")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_client(self) -> Result<Client, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid client id: {e}")))?;
        let organization_id = Uuid::parse_str(&self.organization_id)
            .map_err(|e| RepositoryError::Query(format!("invalid organization_id: {e}")))?;
        let status: SalesStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let cultural_context: Option<CulturalContext> = self
            .cultural_context
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid cultural_context JSON: {e}")))?;
        let metadata: serde_json::Value = serde_json::from_str(&self.metadata)
            .map_err(|e| RepositoryError::Query(format!("invalid metadata JSON: {e}")))?;
        let first_contact_at = self.first_contact_at.as_deref().map(parse_datetime).transpose()?;
        let last_contact_at = self.last_contact_at.as_deref().map(parse_datetime).transpose()?;
        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;

        Ok(Client {
            id,
            organization_id,
            phone: self.phone,
            name: self.name,
            preferred_language: self.preferred_language,
            status,
            cultural_context,
            first_contact_at,
            last_contact_at,
            metadata,
            created_at,
            updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn context_json(context: &Option<CulturalContext>) -> Result<Option<String>, RepositoryError> {
    context
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| RepositoryError::Query(format!("failed to serialize cultural_context: {e}")))
}

// ---------------------------------------------------------------------------
// ClientRepository implementation
// ---------------------------------------------------------------------------

impl ClientRepository for SqliteClientRepository {
    async fn find_by_phone(
        &self,
        organization_id: &Uuid,
        phone: &str,
    ) -> Result<Option<Client>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM clients WHERE organization_id = ? AND phone = ?")
            .bind(organization_id.to_string())
            .bind(phone)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let client_row =
                    ClientRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(client_row.into_client()?))
            }
            None => Ok(None),
        }
    }

    async fn persist_import(
        &self,
        organization_id: &Uuid,
        record: &ParsedClientData,
        existing_client_id: Option<Uuid>,
    ) -> Result<PersistOutcome, RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let now = format_datetime(&Utc::now());
        let context = context_json(&record.cultural_context)?;
        let metadata = serde_json::to_string(&record.metadata)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize metadata: {e}")))?;

        let client_id = match existing_client_id {
            Some(client_id) => {
                // Widen the contact window rather than overwrite it.
                let existing: Option<(Option<String>, Option<String>)> = sqlx::query_as(
                    "SELECT first_contact_at, last_contact_at FROM clients WHERE id = ?",
                )
                .bind(client_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

                let Some((first_existing, last_existing)) = existing else {
                    return Err(RepositoryError::NotFound);
                };

                let first = merge_first(first_existing.as_deref(), &record.first_message_date)?;
                let last = merge_last(last_existing.as_deref(), &record.last_message_date)?;

                sqlx::query(
                    r#"UPDATE clients
                       SET name = COALESCE(?, name), preferred_language = ?, status = ?,
                           cultural_context = COALESCE(?, cultural_context),
                           first_contact_at = ?, last_contact_at = ?, metadata = ?, updated_at = ?
                       WHERE id = ?"#,
                )
                .bind(&record.name)
                .bind(&record.preferred_language)
                .bind(record.detected_status.to_string())
                .bind(&context)
                .bind(format_datetime(&first))
                .bind(format_datetime(&last))
                .bind(&metadata)
                .bind(&now)
                .bind(client_id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

                client_id
            }
            None => {
                let client_id = Uuid::now_v7();
                sqlx::query(
                    r#"INSERT INTO clients
                       (id, organization_id, phone, name, preferred_language, status,
                        cultural_context, first_contact_at, last_contact_at, metadata,
                        created_at, updated_at)
                       VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
                )
                .bind(client_id.to_string())
                .bind(organization_id.to_string())
                .bind(&record.phone)
                .bind(&record.name)
                .bind(&record.preferred_language)
                .bind(record.detected_status.to_string())
                .bind(&context)
                .bind(format_datetime(&record.first_message_date))
                .bind(format_datetime(&record.last_message_date))
                .bind(&metadata)
                .bind(&now)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(|e| match &e {
                    sqlx::Error::Database(db) if db.is_unique_violation() => {
                        RepositoryError::Conflict(format!(
                            "client with phone {} already exists",
                            record.phone
                        ))
                    }
                    _ => RepositoryError::Query(e.to_string()),
                })?;

                client_id
            }
        };

        // Conversation: one per client+channel, reused across imports.
        let conversation_id = {
            let existing: Option<(String,)> =
                sqlx::query_as("SELECT id FROM conversations WHERE client_id = ? AND channel = ?")
                    .bind(client_id.to_string())
                    .bind(IMPORT_CHANNEL)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;

            match existing {
                Some((id,)) => Uuid::parse_str(&id)
                    .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?,
                None => {
                    let conversation_id = Uuid::now_v7();
                    sqlx::query(
                        r#"INSERT INTO conversations (id, organization_id, client_id, channel, created_at)
                           VALUES (?, ?, ?, ?, ?)"#,
                    )
                    .bind(conversation_id.to_string())
                    .bind(organization_id.to_string())
                    .bind(client_id.to_string())
                    .bind(IMPORT_CHANNEL)
                    .bind(&now)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                    conversation_id
                }
            }
        };

        // Message batch: idempotent by (conversation_id, source_message_id).
        let mut messages_inserted: u32 = 0;
        for message in &record.messages {
            let result = sqlx::query(
                r#"INSERT INTO messages
                   (id, conversation_id, source_message_id, content, direction, sender,
                    language, sent_at, created_at)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                   ON CONFLICT (conversation_id, source_message_id) DO NOTHING"#,
            )
            .bind(Uuid::now_v7().to_string())
            .bind(conversation_id.to_string())
            .bind(&message.source_message_id)
            .bind(&message.content)
            .bind(message.direction.to_string())
            .bind(message.sender.to_string())
            .bind(&message.language)
            .bind(format_datetime(&message.timestamp))
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

            messages_inserted += result.rows_affected() as u32;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(PersistOutcome {
            client_id,
            conversation_id,
            messages_inserted,
            client_updated: existing_client_id.is_some(),
        })
    }

    async fn organization_summaries(&self) -> Result<Vec<OrganizationSummary>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT c.organization_id AS organization_id,
                      COUNT(DISTINCT c.id) AS client_count,
                      COUNT(m.id) AS message_count
               FROM clients c
               LEFT JOIN conversations v ON v.client_id = c.id
               LEFT JOIN messages m ON m.conversation_id = v.id
               GROUP BY c.organization_id
               ORDER BY c.organization_id"#,
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let organization_id: String = row
                .try_get("organization_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let client_count: i64 = row
                .try_get("client_count")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            let message_count: i64 = row
                .try_get("message_count")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

            summaries.push(OrganizationSummary {
                organization_id: Uuid::parse_str(&organization_id)
                    .map_err(|e| RepositoryError::Query(format!("invalid organization_id: {e}")))?,
                client_count: client_count as u64,
                message_count: message_count as u64,
            });
        }

        Ok(summaries)
    }
}

fn merge_first(
    existing: Option<&str>,
    incoming: &DateTime<Utc>,
) -> Result<DateTime<Utc>, RepositoryError> {
    match existing {
        Some(existing) => Ok(parse_datetime(existing)?.min(*incoming)),
        None => Ok(*incoming),
    }
}

fn merge_last(
    existing: Option<&str>,
    incoming: &DateTime<Utc>,
) -> Result<DateTime<Utc>, RepositoryError> {
    match existing {
        Some(existing) => Ok(parse_datetime(existing)?.max(*incoming)),
        None => Ok(*incoming),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::tests::test_pool;
    use chrono::Duration;
    use leadflow_types::client::{MessageDirection, MessageSender, ParsedMessage};

    fn parsed_message(source_id: &str, content: &str, days_ago: i64) -> ParsedMessage {
        ParsedMessage {
            content: content.to_string(),
            timestamp: Utc::now() - Duration::days(days_ago),
            direction: MessageDirection::Incoming,
            sender: MessageSender::Client,
            language: Some("en".to_string()),
            source_message_id: Some(source_id.to_string()),
        }
    }

    fn record(phone: &str, name: Option<&str>, messages: Vec<ParsedMessage>) -> ParsedClientData {
        let first = messages
            .first()
            .map(|m| m.timestamp)
            .unwrap_or_else(Utc::now);
        let last = messages.last().map(|m| m.timestamp).unwrap_or_else(Utc::now);
        ParsedClientData {
            phone: phone.to_string(),
            name: name.map(str::to_string),
            preferred_language: "en".to_string(),
            detected_status: SalesStatus::Qualified,
            cultural_context: Some(CulturalContext {
                likely_origin: Some("Israel".to_string()),
                confidence: Some(0.8),
                ..Default::default()
            }),
            messages,
            first_message_date: first,
            last_message_date: last,
            metadata: serde_json::json!({"source": "chat_import"}),
        }
    }

    #[tokio::test]
    async fn test_persist_then_find_by_phone() {
        let pool = test_pool().await;
        let repo = SqliteClientRepository::new(pool);
        let org = Uuid::now_v7();

        let rec = record(
            "+972501234567",
            Some("Dana"),
            vec![
                parsed_message("m1", "שלום", 3),
                parsed_message("m2", "כמה עולה?", 1),
            ],
        );
        let outcome = repo.persist_import(&org, &rec, None).await.unwrap();
        assert_eq!(outcome.messages_inserted, 2);
        assert!(!outcome.client_updated);

        let client = repo
            .find_by_phone(&org, "+972501234567")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(client.id, outcome.client_id);
        assert_eq!(client.name.as_deref(), Some("Dana"));
        assert_eq!(client.status, SalesStatus::Qualified);
        assert_eq!(
            client.cultural_context.unwrap().likely_origin.as_deref(),
            Some("Israel")
        );
    }

    #[tokio::test]
    async fn test_find_by_phone_scoped_to_organization() {
        let pool = test_pool().await;
        let repo = SqliteClientRepository::new(pool);
        let org_a = Uuid::now_v7();
        let org_b = Uuid::now_v7();

        let rec = record("+15551234567", None, vec![parsed_message("m1", "hi", 1)]);
        repo.persist_import(&org_a, &rec, None).await.unwrap();

        assert!(repo.find_by_phone(&org_a, "+15551234567").await.unwrap().is_some());
        assert!(repo.find_by_phone(&org_b, "+15551234567").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reimport_skips_existing_messages() {
        let pool = test_pool().await;
        let repo = SqliteClientRepository::new(pool);
        let org = Uuid::now_v7();

        let rec = record(
            "+15551234567",
            Some("Alice"),
            vec![parsed_message("m1", "hello", 2), parsed_message("m2", "price?", 1)],
        );
        let first = repo.persist_import(&org, &rec, None).await.unwrap();
        assert_eq!(first.messages_inserted, 2);

        // Re-import the same conversation plus one new message.
        let mut again = rec.clone();
        again.messages.push(parsed_message("m3", "thanks", 0));
        let second = repo
            .persist_import(&org, &again, Some(first.client_id))
            .await
            .unwrap();

        assert_eq!(second.client_id, first.client_id);
        assert_eq!(second.conversation_id, first.conversation_id);
        assert_eq!(second.messages_inserted, 1);
        assert!(second.client_updated);
    }

    #[tokio::test]
    async fn test_update_keeps_existing_name_when_new_is_absent() {
        let pool = test_pool().await;
        let repo = SqliteClientRepository::new(pool);
        let org = Uuid::now_v7();

        let rec = record("+15551234567", Some("Alice"), vec![parsed_message("m1", "hi", 1)]);
        let outcome = repo.persist_import(&org, &rec, None).await.unwrap();

        let nameless = record("+15551234567", None, vec![parsed_message("m2", "again", 0)]);
        repo.persist_import(&org, &nameless, Some(outcome.client_id))
            .await
            .unwrap();

        let client = repo.find_by_phone(&org, "+15551234567").await.unwrap().unwrap();
        assert_eq!(client.name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_update_widens_contact_window() {
        let pool = test_pool().await;
        let repo = SqliteClientRepository::new(pool);
        let org = Uuid::now_v7();

        let rec = record(
            "+15551234567",
            Some("Alice"),
            vec![parsed_message("m1", "hi", 10), parsed_message("m2", "price?", 8)],
        );
        let outcome = repo.persist_import(&org, &rec, None).await.unwrap();

        // A later import covering a newer window must extend last_contact_at
        // without moving first_contact_at forward.
        let newer = record("+15551234567", Some("Alice"), vec![parsed_message("m3", "ok", 1)]);
        repo.persist_import(&org, &newer, Some(outcome.client_id))
            .await
            .unwrap();

        let client = repo.find_by_phone(&org, "+15551234567").await.unwrap().unwrap();
        let first = client.first_contact_at.unwrap();
        let last = client.last_contact_at.unwrap();
        assert!(first <= Utc::now() - Duration::days(9));
        assert!(last >= Utc::now() - Duration::days(2));
    }

    #[tokio::test]
    async fn test_duplicate_insert_reports_conflict() {
        let pool = test_pool().await;
        let repo = SqliteClientRepository::new(pool);
        let org = Uuid::now_v7();

        let rec = record("+15551234567", None, vec![parsed_message("m1", "hi", 1)]);
        repo.persist_import(&org, &rec, None).await.unwrap();

        // Inserting again without the existing id violates the phone key.
        let err = repo.persist_import(&org, &rec, None).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_organization_summaries() {
        let pool = test_pool().await;
        let repo = SqliteClientRepository::new(pool);
        let org = Uuid::now_v7();

        let rec_a = record("+15551234567", None, vec![parsed_message("m1", "hi", 1)]);
        let rec_b = record(
            "+15557654321",
            None,
            vec![parsed_message("m2", "hey", 2), parsed_message("m3", "price?", 1)],
        );
        repo.persist_import(&org, &rec_a, None).await.unwrap();
        repo.persist_import(&org, &rec_b, None).await.unwrap();

        let summaries = repo.organization_summaries().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].organization_id, org);
        assert_eq!(summaries[0].client_count, 2);
        assert_eq!(summaries[0].message_count, 3);
    }
}
