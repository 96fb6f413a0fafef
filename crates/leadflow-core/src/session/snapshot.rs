//! Periodic session snapshot loop.
//!
//! Runs on its own task, decoupled from per-contact import processing. A
//! snapshot failure is logged and retried on the next tick, never propagated;
//! the cancellation token is the "connection closing" signal and forces one
//! final snapshot before the loop exits.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use leadflow_types::error::SessionStoreError;

use crate::repository::session::SessionArtifactRepository;

use super::store::SessionStore;

/// Source of the current session payload, implemented by the
/// browser-automation layer.
pub trait SessionExporter: Send + Sync {
    /// Serialize the live automation session into an opaque payload.
    fn export_session(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, SessionStoreError>> + Send;
}

/// Run the snapshot loop until `closing` is cancelled.
///
/// Both the periodic path and the forced final snapshot funnel through the
/// same [`SessionStore::save_bytes`].
pub async fn run_snapshot_loop<E, R>(
    organization_id: Uuid,
    exporter: E,
    store: Arc<SessionStore<R>>,
    period: Duration,
    closing: CancellationToken,
) where
    E: SessionExporter,
    R: SessionArtifactRepository,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval fires immediately; consume it so
    // the first snapshot lands one full period after startup.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                snapshot(&organization_id, &exporter, &store).await;
            }
            _ = closing.cancelled() => {
                tracing::info!(organization = %organization_id, "connection closing, forcing final session snapshot");
                snapshot(&organization_id, &exporter, &store).await;
                return;
            }
        }
    }
}

async fn snapshot<E, R>(organization_id: &Uuid, exporter: &E, store: &SessionStore<R>)
where
    E: SessionExporter,
    R: SessionArtifactRepository,
{
    let payload = match exporter.export_session().await {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(organization = %organization_id, %error, "session export failed, will retry next interval");
            return;
        }
    };

    if let Err(error) = store.save_bytes(organization_id, &payload).await {
        tracing::warn!(organization = %organization_id, %error, "session snapshot save failed, will retry next interval");
    }
}
