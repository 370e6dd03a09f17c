//! The `jagdkurs report` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use jagdkurs_providers::load_config_from;
use jagdkurs_report::{Notifier, QuestionReport};

pub async fn execute(
    subject: String,
    mode: String,
    question: String,
    answer: String,
    alternatives: Vec<String>,
    reason: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let notifier = Notifier::from_endpoints(
        config.report.webhook_url.as_deref(),
        config.report.mail_relay_url.as_deref(),
        config.report.mail_to.as_deref(),
    )?;
    if !notifier.is_configured() {
        tracing::warn!("no report channel configured, report is only acknowledged");
    }

    let report = QuestionReport::new(&subject, &mode, &question, &answer, &reason)
        .with_alternatives(alternatives);
    let receipt = notifier.deliver(&report).await;

    let json = serde_json::to_string_pretty(&receipt).context("failed to serialize receipt")?;
    println!("{json}");
    Ok(())
}
