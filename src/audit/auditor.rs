//! LLM manipulation-risk auditor.
//!
//! One audit is one chat completion against OpenRouter, walking a fixed
//! list of candidate models until one answers with parseable JSON. The
//! audit cache short-circuits repeat requests per slug; failures produce
//! the ERROR sentinel and cache nothing, so a later attempt may retry.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::audit::fallback::first_success;
use crate::cache::{AuditCache, Clock};
use crate::config::AuditConfig;
use crate::market::models::AuditResult;

pub struct RiskAuditor {
    http: reqwest::Client,
    base_url: String,
    referer: String,
    api_key: String,
    models: Vec<String>,
    clock: Arc<dyn Clock>,
}

impl RiskAuditor {
    pub fn new(config: &AuditConfig, api_key: String, clock: Arc<dyn Clock>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            referer: config.referer.clone(),
            api_key,
            models: config.models.clone(),
            clock,
        })
    }

    /// Audit one market, going through the cache first. Returns the
    /// sentinel when every candidate model fails; only real verdicts are
    /// cached.
    #[instrument(skip(self, cache, question, event_title), fields(slug = %slug))]
    pub async fn audit(
        &self,
        cache: &AuditCache,
        question: &str,
        event_title: &str,
        slug: &str,
    ) -> AuditResult {
        if let Some(hit) = cache.get(slug) {
            debug!("Audit cache hit");
            return hit;
        }

        let prompt = build_prompt(question, event_title, self.clock.now());

        let outcome = first_success(&self.models, |model: String| {
            let prompt = prompt.clone();
            async move { self.try_model(&model, &prompt).await }
        })
        .await;

        match outcome {
            Some(result) => {
                cache.put(slug, result.clone());
                result
            }
            None => {
                warn!("All audit models failed");
                AuditResult::unavailable()
            }
        }
    }

    /// One chat completion attempt. Any failure — transport, non-success
    /// status, missing choices, unparseable content — means "try the next
    /// model", so everything collapses to `None`.
    async fn try_model(&self, model: &str, prompt: &str) -> Option<AuditResult> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "system".to_string(),
                content: prompt.to_string(),
            }],
        };

        let resp = match self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .json(&request)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                debug!(model, error = %err, "Audit request failed");
                return None;
            }
        };

        if !resp.status().is_success() {
            debug!(model, status = %resp.status(), "Audit model rejected request");
            return None;
        }

        let body: ChatResponse = match resp.json().await {
            Ok(body) => body,
            Err(err) => {
                debug!(model, error = %err, "Audit response not valid JSON");
                return None;
            }
        };

        let content = &body.choices.first()?.message.content;
        let result = parse_audit(content);
        if result.is_some() {
            info!(model, "Audit verdict produced");
        } else {
            debug!(model, "Audit content not parseable, trying next model");
        }
        result
    }
}

/// The Synapse audit prompt, embedding the current timestamp so models
/// judge deadline ambiguity against real time.
fn build_prompt(question: &str, event_title: &str, now: DateTime<Utc>) -> String {
    format!(
        r#"You are Synapse, a ruthless trade auditor.
Current time: {now}.

Audit this Polymarket event for "Manipulation Risk" and "Ambiguity".
Event: {event_title}
Market: {question}

Output ONLY a JSON object:
{{
    "risk_score": (Integer 1-10, 10=EXTREME RISK),
    "verdict": "SAFE" or "RISKY",
    "reasoning": "One sharp sentence explaining why."
}}"#,
        now = now.to_rfc3339(),
    )
}

/// Parse a model reply into an audit result, tolerating an optional
/// markdown code fence around the JSON object.
pub fn parse_audit(content: &str) -> Option<AuditResult> {
    let raw: RawAudit = serde_json::from_str(strip_code_fence(content)).ok()?;
    Some(AuditResult {
        risk_score: raw.risk_score.clamp(0, 10) as u8,
        verdict: raw.verdict,
        reasoning: raw.reasoning,
    })
}

/// Strip a ```json ... ``` or ``` ... ``` wrapper, returning the inner
/// text. Content without a fence is passed through trimmed.
fn strip_code_fence(content: &str) -> &str {
    for marker in ["```json", "```"] {
        if let Some(start) = content.find(marker) {
            let rest = &content[start + marker.len()..];
            let inner = match rest.find("```") {
                Some(end) => &rest[..end],
                None => rest,
            };
            return inner.trim();
        }
    }
    content.trim()
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct RawAudit {
    risk_score: i64,
    verdict: crate::market::models::Verdict,
    reasoning: String,
}
