//! Generative-language client contract and the Gemini REST implementation.
//!
//! # Responsibility
//! - Define the one call the relay needs: system instruction plus turns in,
//!   text out.
//! - Talk to the `:generateContent` endpoint over blocking HTTP.
//!
//! # Invariants
//! - The API key travels in a header, never in the URL.
//! - No retries; one request per call, bounded by the configured timeout.

use crate::assistant::error::AssistantError;
use crate::config::AssistantConfig;
use crate::model::chat::ChatRole;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// One turn of model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateTurn {
    pub role: ChatRole,
    pub text: String,
}

impl GenerateTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }
}

/// Input of one generation call; `turns` ends with the newest user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub system_instruction: String,
    pub turns: Vec<GenerateTurn>,
}

/// Text generation backend.
pub trait GenerativeClient {
    /// Whether credentials are present; unconfigured clients are never called.
    fn is_configured(&self) -> bool {
        true
    }

    fn generate(&self, request: &GenerateRequest) -> Result<String, AssistantError>;
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl GeminiClient {
    /// Builds a client; a missing key yields an unconfigured client.
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.api_base.trim_end_matches('/'),
                config.model
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GenerativeClient for GeminiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn generate(&self, request: &GenerateRequest) -> Result<String, AssistantError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AssistantError::transport("API key not configured"));
        };

        let body = WireRequest::from_request(request);
        debug!(
            "event=assistant_request module=assistant status=start turns={}",
            request.turns.len()
        );
        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let raw = response.text()?;
        if !status.is_success() {
            let err = AssistantError::from_response(status.as_u16(), &raw);
            warn!(
                "event=assistant_request module=assistant status=error kind={} upstream_status={}",
                err.kind.as_str(),
                status.as_u16()
            );
            return Err(err);
        }

        let parsed: WireResponse = serde_json::from_str(&raw).map_err(|err| {
            AssistantError::transport(format!("failed to parse model response: {err}"))
        })?;
        parsed.text().ok_or_else(|| {
            let reason = parsed
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            AssistantError::transport(format!("empty model response: {reason}"))
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    system_instruction: WireContent<'a>,
    contents: Vec<WireContent<'a>>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

impl<'a> WireRequest<'a> {
    fn from_request(request: &'a GenerateRequest) -> Self {
        Self {
            system_instruction: WireContent {
                role: None,
                parts: vec![WirePart {
                    text: &request.system_instruction,
                }],
            },
            contents: request
                .turns
                .iter()
                .map(|turn| WireContent {
                    role: Some(turn.role.as_str()),
                    parts: vec![WirePart { text: &turn.text }],
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    #[serde(default)]
    prompt_feedback: Option<WirePromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct WireCandidateContent {
    #[serde(default)]
    parts: Vec<WireCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct WireCandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl WireResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        GeminiClient, GenerateRequest, GenerateTurn, GenerativeClient, WireRequest, WireResponse,
    };
    use crate::config::AssistantConfig;
    use crate::model::chat::ChatRole;

    #[test]
    fn request_body_uses_gemini_field_names() {
        let request = GenerateRequest {
            system_instruction: "be kind".to_string(),
            turns: vec![
                GenerateTurn {
                    role: ChatRole::Model,
                    text: "hello".to_string(),
                },
                GenerateTurn::user("hi"),
            ],
        };
        let json = serde_json::to_value(WireRequest::from_request(&request)).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be kind");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "model");
        assert_eq!(json["contents"][1]["role"], "user");
        assert_eq!(json["contents"][1]["parts"][0]["text"], "hi");
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"You did "},{"text":"great!"}]}}]}"#;
        let parsed: WireResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("You did great!"));

        let blocked: WireResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(blocked.text(), None);
    }

    #[test]
    fn client_without_key_is_unconfigured() {
        let client = GeminiClient::new(&AssistantConfig::default()).unwrap();
        assert!(!client.is_configured());
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
