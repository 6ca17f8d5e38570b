//! Connectivity probe
//!
//! Sends one small completion request to check that a model answers with the
//! caller's credential. Failures come back as [`ProbeOutcome::Failure`] rather
//! than an `Err` so a UI can render them directly.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PROBE_MESSAGE: &str = "Hello! Please respond with a short greeting.";
const PROBE_MAX_TOKENS: u32 = 100;
const PROBE_TEMPERATURE: f32 = 0.7;

// ============================================================================
// Chat completion wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ProbeRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProbeResponse {
    choices: Option<Vec<Choice>>,
    usage: Option<TokenUsage>,
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

/// Token accounting reported by the completion endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Result of a probe call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProbeOutcome {
    Success {
        response: String,
        usage: Option<TokenUsage>,
    },
    Failure {
        error: String,
    },
}

impl ProbeOutcome {
    fn failure(error: impl Into<String>) -> Self {
        ProbeOutcome::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ProbeOutcome::Failure { error } => Some(error),
            ProbeOutcome::Success { .. } => None,
        }
    }
}

/// Issue the probe; never returns an error
pub(crate) async fn send_probe(
    client: &reqwest::Client,
    chat_endpoint: &str,
    model_id: &str,
    credential: Option<&str>,
    message: Option<&str>,
) -> ProbeOutcome {
    let Some(credential) = credential.map(str::trim).filter(|c| !c.is_empty()) else {
        return ProbeOutcome::failure("API key is required to test a model");
    };

    let request = ProbeRequest {
        model: model_id,
        messages: vec![ChatMessage {
            role: "user",
            content: message.unwrap_or(DEFAULT_PROBE_MESSAGE),
        }],
        max_tokens: PROBE_MAX_TOKENS,
        temperature: PROBE_TEMPERATURE,
    };

    tracing::debug!("Probing model '{}' at {}", model_id, chat_endpoint);

    let response = match client
        .post(chat_endpoint)
        .header("Authorization", format!("Bearer {}", credential))
        .header("Content-Type", "application/json")
        .header("X-Title", "Model Chooser")
        .json(&request)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => return ProbeOutcome::failure(format!("Request failed: {}", e)),
    };

    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return ProbeOutcome::failure(format!("Failed to read response: {}", e)),
    };

    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.trim().to_string());
        tracing::warn!("Probe of '{}' failed with HTTP {}", model_id, status.as_u16());
        return if detail.is_empty() {
            ProbeOutcome::failure(format!("HTTP {}", status.as_u16()))
        } else {
            ProbeOutcome::failure(format!("HTTP {}: {}", status.as_u16(), detail))
        };
    }

    let parsed: ProbeResponse = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(e) => return ProbeOutcome::failure(format!("Failed to parse response: {}", e)),
    };

    if let Some(error) = parsed.error {
        return ProbeOutcome::failure(format!("Provider error: {}", error.message));
    }

    match parsed
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message.content)
    {
        Some(content) => ProbeOutcome::Success {
            response: content,
            usage: parsed.usage,
        },
        None => ProbeOutcome::failure("No response content from model"),
    }
}
