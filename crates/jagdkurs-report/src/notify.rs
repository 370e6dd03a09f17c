//! Question-report sink.
//!
//! Learners flag questions they believe are wrong. A report is flattened
//! into a short German text summary and delivered best-effort through up
//! to two independent channels: a JSON webhook and an HTTP mail relay.
//! Channel failures are recorded in the receipt, never raised.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const CHANNEL_TIMEOUT_SECS: u64 = 10;
const HEADLINE: &str = "Jagdkurs Meldung";

/// A flagged question as submitted by the learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReport {
    pub id: Uuid,
    #[serde(default)]
    pub subject: String,
    /// Exam mode the learner was in (e.g. "mc", "freitext").
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl QuestionReport {
    pub fn new(subject: &str, mode: &str, question: &str, answer: &str, reason: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: subject.to_string(),
            mode: mode.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            alternatives: Vec::new(),
            reason: reason.to_string(),
            created_at: Some(Utc::now()),
        }
    }

    #[must_use]
    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    fn headline(&self) -> String {
        format!("{HEADLINE}: {}", or_dash(&self.subject))
    }
}

fn or_dash(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Render the flattened text summary of a report.
pub fn summary_text(report: &QuestionReport) -> String {
    let alternatives: Vec<&str> = report
        .alternatives
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    let alternatives = if alternatives.is_empty() {
        "-".to_string()
    } else {
        alternatives.join(", ")
    };
    let time = report
        .created_at
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    [
        report.headline(),
        format!("Fach: {}", or_dash(&report.subject)),
        format!("Modus: {}", or_dash(&report.mode)),
        format!("Frage: {}", or_dash(&report.question)),
        format!("Antwort: {}", or_dash(&report.answer)),
        format!("Alternativen: {alternatives}"),
        format!("Grund: {}", or_dash(&report.reason)),
        format!("Zeit: {time}"),
    ]
    .join("\n")
}

/// Read a report back from its text summary.
///
/// Keys are matched case-insensitively, lines without a colon are skipped
/// and `-` values count as empty. The report gets a fresh id.
pub fn parse_summary(text: &str) -> QuestionReport {
    let mut report = QuestionReport {
        id: Uuid::new_v4(),
        subject: String::new(),
        mode: String::new(),
        question: String::new(),
        answer: String::new(),
        alternatives: Vec::new(),
        reason: String::new(),
        created_at: None,
    };

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        let text_value = if value == "-" { "" } else { value }.to_string();
        match key.trim().to_lowercase().as_str() {
            "fach" => report.subject = text_value,
            "modus" => report.mode = text_value,
            "frage" => report.question = text_value,
            "antwort" => report.answer = text_value,
            "grund" => report.reason = text_value,
            "alternativen" => {
                report.alternatives = value
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty() && *a != "-")
                    .map(str::to_string)
                    .collect();
            }
            "zeit" => {
                report.created_at = DateTime::parse_from_rfc3339(value)
                    .ok()
                    .map(|t| t.with_timezone(&Utc));
            }
            _ => {}
        }
    }
    report
}

/// Outcome of one channel for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ChannelStatus {
    Sent,
    /// The channel is not configured.
    Skipped,
    Failed(String),
}

/// Acknowledgement returned for every report, whatever the channels did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub ok: bool,
    pub id: Uuid,
    pub webhook: ChannelStatus,
    pub email: ChannelStatus,
}

/// A delivery channel for report summaries.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, report: &QuestionReport, summary: &str) -> Result<()>;
}

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(CHANNEL_TIMEOUT_SECS))
        .build()
        .context("failed to build HTTP client")
}

async fn post_json<T: Serialize + ?Sized>(client: &reqwest::Client, url: &str, body: &T) -> Result<()> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("HTTP {}: {}", status.as_u16(), body.trim());
    }
    Ok(())
}

/// Posts `{ text, payload }` to a chat-style webhook.
pub struct WebhookChannel {
    url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: url.to_string(),
            client: http_client()?,
        })
    }
}

#[derive(Serialize)]
struct WebhookBody<'a> {
    text: &'a str,
    payload: &'a QuestionReport,
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, report: &QuestionReport, summary: &str) -> Result<()> {
        let body = WebhookBody {
            text: summary,
            payload: report,
        };
        post_json(&self.client, &self.url, &body).await
    }
}

/// Posts `{ to, subject, text }` to an HTTP mail relay.
pub struct MailRelayChannel {
    url: String,
    to: String,
    client: reqwest::Client,
}

impl MailRelayChannel {
    pub fn new(url: &str, to: &str) -> Result<Self> {
        Ok(Self {
            url: url.to_string(),
            to: to.to_string(),
            client: http_client()?,
        })
    }
}

#[derive(Serialize)]
struct MailBody<'a> {
    to: &'a str,
    subject: String,
    text: &'a str,
}

#[async_trait]
impl NotificationChannel for MailRelayChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, report: &QuestionReport, summary: &str) -> Result<()> {
        let body = MailBody {
            to: &self.to,
            subject: report.headline(),
            text: summary,
        };
        post_json(&self.client, &self.url, &body).await
    }
}

/// Fans a report out to the configured channels.
#[derive(Default)]
pub struct Notifier {
    webhook: Option<Box<dyn NotificationChannel>>,
    email: Option<Box<dyn NotificationChannel>>,
}

impl Notifier {
    pub fn new(
        webhook: Option<Box<dyn NotificationChannel>>,
        email: Option<Box<dyn NotificationChannel>>,
    ) -> Self {
        Self { webhook, email }
    }

    /// Build channels from endpoint settings. Blank values leave a channel
    /// unconfigured; the mail relay needs both its URL and a recipient.
    pub fn from_endpoints(
        webhook_url: Option<&str>,
        mail_relay_url: Option<&str>,
        mail_to: Option<&str>,
    ) -> Result<Self> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }

        let webhook = match present(webhook_url) {
            Some(url) => Some(Box::new(WebhookChannel::new(url)?) as Box<dyn NotificationChannel>),
            None => None,
        };
        let email = match (present(mail_relay_url), present(mail_to)) {
            (Some(url), Some(to)) => {
                Some(Box::new(MailRelayChannel::new(url, to)?) as Box<dyn NotificationChannel>)
            }
            _ => None,
        };
        Ok(Self::new(webhook, email))
    }

    pub fn is_configured(&self) -> bool {
        self.webhook.is_some() || self.email.is_some()
    }

    /// Deliver a report through every configured channel.
    pub async fn deliver(&self, report: &QuestionReport) -> DeliveryReceipt {
        let summary = summary_text(report);
        let (webhook, email) = tokio::join!(
            send_via(self.webhook.as_deref(), report, &summary),
            send_via(self.email.as_deref(), report, &summary),
        );
        DeliveryReceipt {
            ok: true,
            id: report.id,
            webhook,
            email,
        }
    }
}

async fn send_via(
    channel: Option<&dyn NotificationChannel>,
    report: &QuestionReport,
    summary: &str,
) -> ChannelStatus {
    let Some(channel) = channel else {
        return ChannelStatus::Skipped;
    };
    match channel.send(report, summary).await {
        Ok(()) => {
            tracing::debug!(channel = channel.name(), id = %report.id, "report delivered");
            ChannelStatus::Sent
        }
        Err(e) => {
            tracing::warn!(channel = channel.name(), id = %report.id, "report delivery failed: {e:#}");
            ChannelStatus::Failed(format!("{e:#}"))
        }
    }
}
