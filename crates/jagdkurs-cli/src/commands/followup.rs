//! The `jagdkurs followup` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use jagdkurs_core::model::FollowupRequest;
use jagdkurs_core::FollowupResponder;
use jagdkurs_providers::{create_judge, load_config_from};

pub async fn execute(
    question: String,
    model_answer: String,
    user_answer: Option<String>,
    followup_question: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let judge = create_judge(&config.judge)?;
    let responder = FollowupResponder::new(judge, config.judge.settings());

    let request = FollowupRequest {
        question,
        model_answer,
        user_answer,
        followup_question,
    };
    let answer = responder.answer_followup(&request).await?;

    let json = serde_json::to_string_pretty(&answer).context("failed to serialize answer")?;
    println!("{json}");
    Ok(())
}
