//! Gemini API client for the budtender assistant.
//!
//! Uses the non-streaming `generateContent` endpoint: the whole history goes
//! up with each message and a single reply comes back.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, ChatError};
use super::{Assistant, ChatMessage, ChatRole};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 250;

/// Persona and house rules for the assistant.
pub const BUDTENDER_SYSTEM_INSTRUCTION: &str = "\
You are \"Bud,\" the friendly and knowledgeable AI Budtender for Cannabiabuds, a premier cannabis dispensary.
Your goal is to help customers find the perfect product based on their needs, experience level, and desired effects.
The store sells Flower, Edibles, Vapes, Concentrates, and Topicals.
Common strains include Blue Dream, OG Kush, Sour Diesel, and Granddaddy Purple.

Guidelines:
1. Be polite, chill, and professional.
2. Ask clarifying questions if the user's request is vague (e.g., \"Are you looking for something to help you sleep or to get creative?\").
3. Recommend specific types of products (e.g., \"For sleep, I'd recommend an Indica like Granddaddy Purple or our Berry Gummies\").
4. Educate gently about terpenes and cannabinoids if asked.
5. Keep responses concise (under 100 words) unless asked for a detailed explanation.
6. Do NOT give medical advice. Always suggest consulting a doctor for medical issues.
";

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &GeminiConfig) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| ChatError::Parse(format!("Invalid API key format: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                endpoint: format!("{GEMINI_API_BASE}/{}:generateContent", config.model),
                model: config.model.clone(),
            }),
        })
    }

    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ChatError {
        match response.text().await {
            Ok(body) => {
                let message = serde_json::from_str::<ApiErrorResponse>(&body)
                    .map_or(body, |api_error| api_error.error.message);
                ChatError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
            Err(e) => ChatError::Http(e),
        }
    }
}

#[async_trait]
impl Assistant for GeminiClient {
    #[instrument(skip(self, history, message), fields(model = %self.inner.model, turns = history.len()))]
    async fn reply(&self, history: &[ChatMessage], message: &str) -> Result<String, ChatError> {
        let request = GenerateContentRequest::new(history, message);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Parse(format!("Failed to parse response: {e}")))?;
        Ok(parsed.text())
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(history: &'a [ChatMessage], message: &'a str) -> Self {
        let contents = history
            .iter()
            .map(|turn| Content::new(Some(turn.role), &turn.text))
            .chain(std::iter::once(Content::new(Some(ChatRole::User), message)))
            .collect();

        Self {
            system_instruction: Content::new(None, BUDTENDER_SYSTEM_INSTRUCTION),
            contents,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<ChatRole>,
    parts: [Part<'a>; 1],
}

impl<'a> Content<'a> {
    const fn new(role: Option<ChatRole>, text: &'a str) -> Self {
        Self {
            role,
            parts: [Part { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate; empty if there is none.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_request_shape() {
        let history = vec![
            ChatMessage::user("Something for sleep?"),
            ChatMessage::model("Try Granddaddy Purple."),
        ];
        let request = GenerateContentRequest::new(&history, "Any edibles?");
        let json = serde_json::to_value(&request).unwrap();

        assert!(json["systemInstruction"].get("role").is_none());
        assert!(
            json["systemInstruction"]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("Bud")
        );
        assert_eq!(json["contents"].as_array().unwrap().len(), 3);
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][2]["parts"][0]["text"], "Any edibles?");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 250);
        assert!((json["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "Hey "}, {"text": "there."}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text(), "Hey there.");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[test]
    fn test_client_targets_configured_model() {
        let client = GeminiClient::new(&GeminiConfig {
            api_key: SecretString::from("AIzaSyD4k9Qm2Xw7Lp0Rt8Vb3Nc6Hj1Fg5Ez"),
            model: "gemini-2.5-flash".to_string(),
        })
        .unwrap();
        assert!(client.inner.endpoint.ends_with("/gemini-2.5-flash:generateContent"));
        assert!(!format!("{client:?}").contains("AIza"));
    }
}
