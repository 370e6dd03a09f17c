//! The `jagdkurs evaluate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use jagdkurs_core::model::EvaluateRequest;
use jagdkurs_core::Evaluator;
use jagdkurs_providers::{create_judge, load_config_from};

pub async fn execute(
    question: String,
    model_answer: String,
    user_answer: String,
    alternatives: Vec<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let judge = create_judge(&config.judge)?;
    let evaluator = Evaluator::new(judge, config.judge.settings());
    tracing::debug!(remote = evaluator.has_judge(), "evaluating answer");

    let request = EvaluateRequest {
        question,
        model_answer,
        user_answer,
        alternative_answers: alternatives,
    };
    let result = evaluator.evaluate(&request).await?;

    let json = serde_json::to_string_pretty(&result).context("failed to serialize result")?;
    println!("{json}");
    Ok(())
}
