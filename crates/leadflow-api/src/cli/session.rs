//! `lflow session` command handlers.
//!
//! Operational access to the session artifact store: inspect, clear, and
//! move payloads in and out through the two-phase staging protocol.

use std::path::PathBuf;

use clap::Subcommand;
use uuid::Uuid;

use leadflow_types::session::SessionArtifactStatus;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Show whether a stored session exists for an organization.
    Status {
        #[arg(long)]
        organization_id: Uuid,
    },

    /// Soft-invalidate the stored session payload (forces a fresh login).
    Clear {
        #[arg(long)]
        organization_id: Uuid,
    },

    /// Write the stored session payload to a file.
    Export {
        #[arg(long)]
        organization_id: Uuid,

        /// Destination file for the payload.
        #[arg(long)]
        out: PathBuf,
    },

    /// Load a session payload from a file into the store.
    Restore {
        #[arg(long)]
        organization_id: Uuid,

        /// File holding a previously exported payload.
        #[arg(long)]
        from: PathBuf,
    },
}

pub async fn run(state: &AppState, action: SessionCommand, json: bool) -> anyhow::Result<()> {
    let store = state.session_store();

    match action {
        SessionCommand::Status { organization_id } => {
            let artifact = store.artifact(&organization_id).await?;
            if json {
                let value = match &artifact {
                    Some(artifact) => serde_json::json!({
                        "organization_id": organization_id,
                        "status": artifact.status,
                        "payload_bytes": artifact.payload.len(),
                        "updated_at": artifact.updated_at,
                    }),
                    None => serde_json::json!({
                        "organization_id": organization_id,
                        "status": null,
                    }),
                };
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            match artifact {
                Some(artifact) if artifact.status == SessionArtifactStatus::Active => {
                    println!(
                        "  {} session stored ({} bytes, updated {})",
                        console::style("✓").green(),
                        artifact.payload.len(),
                        artifact.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                }
                Some(_) => {
                    println!(
                        "  {} session cleared, re-authentication required",
                        console::style("✗").yellow()
                    );
                }
                None => {
                    println!("  {} no session stored", console::style("✗").red());
                }
            }
        }

        SessionCommand::Clear { organization_id } => {
            store.clear(&organization_id).await?;
            if json {
                println!("{}", serde_json::json!({"cleared": true}));
            } else {
                println!("  {} session cleared", console::style("✓").green());
            }
        }

        SessionCommand::Export { organization_id, out } => {
            let payload = store.extract(&organization_id).await?;
            tokio::fs::write(&out, &payload).await?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({"exported_bytes": payload.len(), "path": out})
                );
            } else {
                println!(
                    "  {} exported {} bytes to {}",
                    console::style("✓").green(),
                    payload.len(),
                    out.display()
                );
            }
        }

        SessionCommand::Restore { organization_id, from } => {
            let payload = tokio::fs::read(&from).await?;
            // Stage first, then commit: the same protocol the automation
            // layer uses, so a failed save leaves no half-written artifact.
            store.stage(&organization_id, &payload).await?;
            store.commit(&organization_id).await?;
            if json {
                println!("{}", serde_json::json!({"restored_bytes": payload.len()}));
            } else {
                println!(
                    "  {} restored {} bytes from {}",
                    console::style("✓").green(),
                    payload.len(),
                    from.display()
                );
            }
        }
    }

    Ok(())
}
