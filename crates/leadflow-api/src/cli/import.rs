//! `lflow import` command handler.

use std::path::PathBuf;

use clap::Args;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use leadflow_core::classify::{Classifier, LlmClassifier, StatusClassifier};
use leadflow_core::import::ImportOrchestrator;
use leadflow_infra::extract::JsonFileExtractor;
use leadflow_infra::llm::anthropic::AnthropicProvider;
use leadflow_infra::sqlite::client::SqliteClientRepository;
use leadflow_types::import::{ImportOptions, ImportRunResult, ImportRunStatus};

use crate::state::AppState;

#[derive(Args)]
pub struct ImportArgs {
    /// Organization to import into.
    #[arg(long)]
    pub organization_id: Uuid,

    /// Chat-export JSON file to read contacts and messages from.
    #[arg(long)]
    pub input: PathBuf,

    /// Execute the full pipeline except the final persistence step.
    #[arg(long)]
    pub dry_run: bool,

    /// Process at most N contacts.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Classify with the LLM instead of the configured default strategy.
    #[arg(long)]
    pub use_llm: bool,

    /// Skip contacts whose phone already exists in the organization (default).
    #[arg(long, overrides_with = "no_skip_duplicates")]
    pub skip_duplicates: bool,

    /// Import duplicates (merging into the existing client) instead of skipping.
    #[arg(long, overrides_with = "skip_duplicates")]
    pub no_skip_duplicates: bool,
}

pub async fn run_import(state: &AppState, args: ImportArgs, json: bool) -> anyhow::Result<()> {
    let options = ImportOptions {
        dry_run: args.dry_run,
        limit: args.limit,
        use_llm: args.use_llm.then_some(true),
        skip_duplicates: args.skip_duplicates || !args.no_skip_duplicates,
    };

    let cancel = CancellationToken::new();
    let signal_guard = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, pausing after the current contact");
            signal_guard.cancel();
        }
    });

    let extractor = JsonFileExtractor::load(&args.input)
        .await
        .map_err(|e| anyhow::anyhow!("cannot open chat export: {e}"))?;
    let repository = state.client_repository();
    let classifier_config = &state.config.classifier;

    let spinner = if json {
        None
    } else {
        let spinner = indicatif::ProgressBar::new_spinner();
        spinner.set_message("importing chat history...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(120));
        Some(spinner)
    };

    // The LLM provider (and its API key) is only needed when this run can
    // actually route to the LLM.
    let wants_llm = options.use_llm.unwrap_or(classifier_config.prefer_llm);
    let result = if wants_llm {
        let api_key = std::env::var(AnthropicProvider::API_KEY_ENV).map_err(|_| {
            anyhow::anyhow!(
                "LLM classification requires {} to be set",
                AnthropicProvider::API_KEY_ENV
            )
        })?;
        let provider = AnthropicProvider::new(SecretString::from(api_key));
        let classifier = StatusClassifier::new(
            Some(LlmClassifier::new(provider, classifier_config.clone())),
            classifier_config.prefer_llm,
            classifier_config.fallback_on_error,
        );
        execute(args.organization_id, extractor, repository, classifier, &options, &cancel).await
    } else {
        execute(
            args.organization_id,
            extractor,
            repository,
            StatusClassifier::heuristic_only(),
            &options,
            &cancel,
        )
        .await
    };

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    print_result(&result, json)?;

    if result.status == ImportRunStatus::Failed {
        let detail = result
            .errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "unknown error".to_string());
        anyhow::bail!("import failed: {detail}");
    }
    Ok(())
}

async fn execute<L: Classifier>(
    organization_id: Uuid,
    extractor: JsonFileExtractor,
    repository: SqliteClientRepository,
    classifier: StatusClassifier<L>,
    options: &ImportOptions,
    cancel: &CancellationToken,
) -> ImportRunResult {
    ImportOrchestrator::new(organization_id, extractor, repository, classifier)
        .run(options, cancel)
        .await
}

fn print_result(result: &ImportRunResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let status_style = match result.status {
        ImportRunStatus::Completed => console::style(result.status.to_string()).green(),
        ImportRunStatus::Paused => console::style(result.status.to_string()).yellow(),
        _ => console::style(result.status.to_string()).red(),
    };

    println!();
    println!(
        "  Import run {} {}",
        console::style(result.run_id).dim(),
        status_style.bold()
    );
    println!();
    println!(
        "  {} contacts, {} processed, {} imported, {} failed, {} duplicates skipped",
        result.total_contacts,
        result.processed,
        console::style(result.succeeded).green(),
        console::style(result.failed).red(),
        console::style(result.skipped_duplicates).yellow(),
    );

    if !result.errors.is_empty() {
        let mut table = comfy_table::Table::new();
        table.set_header(vec!["Contact", "Error"]);
        for error in &result.errors {
            table.add_row(vec![error.contact_ref.as_str(), error.message.as_str()]);
        }
        println!();
        println!("{table}");
    }
    println!();
    Ok(())
}
