//! Scripted judge for tests and offline demos.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use jagdkurs_core::traits::{JudgeRequest, JudgeResponse, RemoteJudge};

/// A judge that answers from a script instead of the network.
///
/// Replies are chosen by prompt substring; the first matching rule wins,
/// otherwise the default reply is used. A mock built with
/// [`MockJudge::unavailable`] fails every call.
pub struct MockJudge {
    /// Prompt substring → reply, checked in order.
    rules: Vec<(String, String)>,
    default_reply: Option<String>,
    call_count: AtomicU32,
    last_request: Mutex<Option<JudgeRequest>>,
}

impl MockJudge {
    pub fn new(rules: Vec<(String, String)>, default_reply: &str) -> Self {
        Self {
            rules,
            default_reply: Some(default_reply.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A judge that always returns the same text.
    pub fn with_fixed_reply(reply: &str) -> Self {
        Self::new(Vec::new(), reply)
    }

    /// A judge whose every call fails like an unreachable endpoint.
    pub fn unavailable() -> Self {
        Self {
            default_reply: None,
            ..Self::new(Vec::new(), "")
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<JudgeRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl RemoteJudge for MockJudge {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &JudgeRequest) -> anyhow::Result<JudgeResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let text = self
            .rules
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.default_reply.clone())
            .ok_or_else(|| anyhow::anyhow!("mock judge unavailable"))?;

        Ok(JudgeResponse { text })
    }
}
