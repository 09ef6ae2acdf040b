// agent/mod.rs - LLM decision agent
//
// Sends the serialized analysis payload to an OpenAI chat completion and
// parses the reply into a typed Decision. The reply is free text, so the
// parse is a fallible step with its own error kind.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::AgentConfig;
use crate::models::{Decision, TradeAction};

const SYSTEM_PROMPT: &str = "You are an expert in cryptocurrency coin investing. \
Tell me whether to buy, sell, or hold at the moment based on the data provided.\n\
\n\
Response Example:\n\
{\"decision\": \"buy\", \"reason\": \"some technical reason\"}\n\
{\"decision\": \"sell\", \"reason\": \"some technical reason\"}\n\
{\"decision\": \"hold\", \"reason\": \"some technical reason\"}";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("completion service unavailable: {0}")]
    Upstream(String),

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::Upstream(err.to_string())
    }
}

/// Seam between the pipeline and the completion service, so tests can
/// substitute a canned model.
#[async_trait]
pub trait DecisionModel: Send + Sync {
    async fn invoke(&self, source: &str) -> Result<Decision, AgentError>;
}

pub struct DecisionAgent {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl DecisionAgent {
    pub fn new(config: &AgentConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_base: config.api_base.clone(),
            api_key,
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl DecisionModel for DecisionAgent {
    async fn invoke(&self, source: &str) -> Result<Decision, AgentError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: source,
                },
            ],
        };

        debug!("requesting completion from {}", self.model);
        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        let body = response.text().await?;
        let completion: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AgentError::MalformedResponse(format!("invalid completion body: {}", e)))?;
        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| AgentError::MalformedResponse("completion returned no choices".to_string()))?;

        parse_decision(content)
    }
}

/// Parse the model's reply as a `{decision, reason}` object. Accepts a
/// markdown code fence around the JSON and any casing of the action.
pub fn parse_decision(content: &str) -> Result<Decision, AgentError> {
    let text = strip_code_fence(content);
    let raw: RawDecision = serde_json::from_str(text).map_err(|e| {
        AgentError::MalformedResponse(format!("expected {{decision, reason}} JSON: {}", e))
    })?;

    let decision = match raw.decision.to_lowercase().as_str() {
        "buy" => TradeAction::Buy,
        "sell" => TradeAction::Sell,
        "hold" => TradeAction::Hold,
        other => {
            return Err(AgentError::MalformedResponse(format!(
                "unknown decision value '{}'",
                other
            )))
        }
    };

    Ok(Decision {
        decision,
        reason: raw.reason,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RawDecision {
    decision: String,
    reason: String,
}
