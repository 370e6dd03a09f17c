//! jagdkurs-providers: remote judge integrations.
//!
//! Implements the `RemoteJudge` trait for the OpenAI Responses API and a
//! scripted mock, and loads the judge/report configuration.

pub mod config;
pub mod error;
pub mod mock;
pub mod openai;

pub use config::{
    create_judge, load_config, load_config_from, JagdkursConfig, JudgeConfig, ReportConfig,
};
pub use error::ProviderError;
pub use openai::OpenAiJudge;
