//! `lflow status` command handler.

use leadflow_core::repository::client::ClientRepository;

use crate::state::AppState;

pub async fn status(state: &AppState, json: bool) -> anyhow::Result<()> {
    let summaries = state.client_repository().organization_summaries().await?;

    if json {
        let value = serde_json::json!({
            "data_dir": state.data_dir,
            "database": state.data_dir.join("leadflow.db"),
            "organizations": summaries,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Leadflow data in {}",
        console::style("●").cyan(),
        console::style(state.data_dir.display()).dim()
    );
    println!();

    if summaries.is_empty() {
        println!("  no clients imported yet");
        println!();
        return Ok(());
    }

    let mut table = comfy_table::Table::new();
    table.set_header(vec!["Organization", "Clients", "Messages"]);
    for summary in &summaries {
        table.add_row(vec![
            summary.organization_id.to_string(),
            summary.client_count.to_string(),
            summary.message_count.to_string(),
        ]);
    }
    println!("{table}");
    println!();
    Ok(())
}
