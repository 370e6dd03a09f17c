//! Judge and report configuration, and the judge factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use jagdkurs_core::engine::{JudgeSettings, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use jagdkurs_core::traits::RemoteJudge;

use crate::openai::OpenAiJudge;

/// Remote judge settings.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Empty means "no credential": evaluation stays heuristic.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_json_output")]
    pub json_output: bool,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

impl std::fmt::Debug for JudgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("json_output", &self.json_output)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            json_output: default_json_output(),
            max_output_tokens: None,
        }
    }
}

impl JudgeConfig {
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Settings for the evaluation orchestrator and follow-up responder.
    pub fn settings(&self) -> JudgeSettings {
        JudgeSettings {
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            json_output: self.json_output,
            max_output_tokens: self.max_output_tokens,
        }
    }
}

/// Report sink endpoints. Any of them may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub mail_relay_url: Option<String>,
    #[serde(default)]
    pub mail_to: Option<String>,
}

/// Top-level jagdkurs configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JagdkursConfig {
    /// Question bank JSON file.
    #[serde(default = "default_bank")]
    pub bank: PathBuf,
    #[serde(default)]
    pub judge: JudgeConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_bank() -> PathBuf {
    PathBuf::from("data/questions.json")
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_json_output() -> bool {
    true
}

impl Default for JagdkursConfig {
    fn default() -> Self {
        Self {
            bank: default_bank(),
            judge: JudgeConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_optional(value: &mut Option<String>) {
    if let Some(v) = value {
        *v = resolve_env_vars(v);
    }
}

fn resolve_config(config: &mut JagdkursConfig) {
    config.judge.api_key = resolve_env_vars(&config.judge.api_key);
    config.judge.model = resolve_env_vars(&config.judge.model);
    resolve_optional(&mut config.judge.base_url);
    resolve_optional(&mut config.report.webhook_url);
    resolve_optional(&mut config.report.mail_relay_url);
    resolve_optional(&mut config.report.mail_to);
}

/// Apply environment overrides, reading variables through `lookup`.
///
/// `OPENAI_API_KEY` wins over `CHATGPT_API_KEY`; empty values are ignored.
fn apply_env_overrides<F>(config: &mut JagdkursConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = var("OPENAI_API_KEY").or_else(|| var("CHATGPT_API_KEY")) {
        config.judge.api_key = key;
    }
    if let Some(model) = var("OPENAI_MODEL") {
        config.judge.model = model;
    }
    if let Some(url) = var("REPORT_WEBHOOK_URL") {
        config.report.webhook_url = Some(url);
    }
    if let Some(url) = var("REPORT_MAIL_RELAY_URL") {
        config.report.mail_relay_url = Some(url);
    }
    if let Some(to) = var("REPORT_MAIL_TO") {
        config.report.mail_to = Some(to);
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `jagdkurs.toml` in the current directory
/// 2. `~/.config/jagdkurs/config.toml`
///
/// Environment variable overrides: `OPENAI_API_KEY` (or `CHATGPT_API_KEY`),
/// `OPENAI_MODEL`, `REPORT_WEBHOOK_URL`, `REPORT_MAIL_RELAY_URL`, `REPORT_MAIL_TO`.
pub fn load_config() -> Result<JagdkursConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<JagdkursConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("jagdkurs.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<JagdkursConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => JagdkursConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    resolve_config(&mut config);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("jagdkurs"))
}

/// Create the remote judge, or `None` when no credential is configured.
pub fn create_judge(config: &JudgeConfig) -> Result<Option<Arc<dyn RemoteJudge>>> {
    if !config.has_credential() {
        tracing::debug!("no judge credential configured");
        return Ok(None);
    }
    let judge = OpenAiJudge::new(&config.api_key, config.base_url.clone(), config.timeout_secs)?;
    Ok(Some(Arc::new(judge)))
}

/// Starter configuration written by `jagdkurs init`.
pub const STARTER_CONFIG: &str = r#"# jagdkurs configuration
bank = "data/questions.json"

[judge]
# Leave empty to grade with the offline heuristic only.
api_key = "${OPENAI_API_KEY}"
model = "gpt-5-mini"
timeout_secs = 30
json_output = true

[report]
# webhook_url = "https://example.invalid/hooks/jagdkurs"
# mail_relay_url = "https://example.invalid/mail"
# mail_to = "kurs@example.invalid"
"#;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_JAGDKURS_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_JAGDKURS_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_JAGDKURS_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_JAGDKURS_UNSET_VAR}"), "");
        std::env::remove_var("_JAGDKURS_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = JagdkursConfig::default();
        assert_eq!(config.bank, PathBuf::from("data/questions.json"));
        assert_eq!(config.judge.model, "gpt-5-mini");
        assert_eq!(config.judge.timeout_secs, 30);
        assert!(config.judge.json_output);
        assert!(!config.judge.has_credential());
        assert!(config.report.webhook_url.is_none());
    }

    #[test]
    fn parse_config_file() {
        let toml_str = r#"
bank = "bank.json"

[judge]
api_key = "sk-test"
timeout_secs = 5

[report]
webhook_url = "http://localhost:9000/hook"
"#;
        let config: JagdkursConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bank, PathBuf::from("bank.json"));
        assert_eq!(config.judge.api_key, "sk-test");
        assert_eq!(config.judge.model, "gpt-5-mini");
        assert_eq!(config.judge.settings().timeout, Duration::from_secs(5));
        assert_eq!(
            config.report.webhook_url.as_deref(),
            Some("http://localhost:9000/hook")
        );
    }

    #[test]
    fn starter_config_parses() {
        let config: JagdkursConfig = toml::from_str(STARTER_CONFIG).unwrap();
        assert_eq!(config.judge.api_key, "${OPENAI_API_KEY}");
        assert!(config.report.mail_to.is_none());
    }

    #[test]
    fn env_overrides() {
        let mut config = JagdkursConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("CHATGPT_API_KEY", "sk-chatgpt"),
                ("OPENAI_MODEL", "gpt-5"),
                ("REPORT_MAIL_TO", "kurs@example.invalid"),
            ]),
        );
        assert_eq!(config.judge.api_key, "sk-chatgpt");
        assert_eq!(config.judge.model, "gpt-5");
        assert_eq!(config.report.mail_to.as_deref(), Some("kurs@example.invalid"));

        apply_env_overrides(
            &mut config,
            env(&[("OPENAI_API_KEY", "sk-openai"), ("CHATGPT_API_KEY", "sk-chatgpt")]),
        );
        assert_eq!(config.judge.api_key, "sk-openai");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = JagdkursConfig::default();
        config.judge.api_key = "sk-file".into();
        apply_env_overrides(&mut config, env(&[("OPENAI_API_KEY", "  ")]));
        assert_eq!(config.judge.api_key, "sk-file");
    }

    #[test]
    fn debug_masks_api_key() {
        let config = JudgeConfig {
            api_key: "sk-secret".into(),
            ..JudgeConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jagdkurs.toml");
        std::fs::write(&path, "[judge]\nmodel = \"gpt-5-nano\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.bank, PathBuf::from("data/questions.json"));
        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn no_credential_means_no_judge() {
        assert!(create_judge(&JudgeConfig::default()).unwrap().is_none());

        let config = JudgeConfig {
            api_key: "sk-test".into(),
            ..JudgeConfig::default()
        };
        let judge = create_judge(&config).unwrap().unwrap();
        assert_eq!(judge.name(), "openai");
    }
}
