//! GeminiProfileGenerator - Direct REST API implementation for Gemini.
//!
//! Persona profiles use structured output (a JSON response schema). The
//! directory search uses the Google Search grounding tool, which cannot be
//! combined with a response schema, so its JSON answer is parsed leniently
//! and grounding chunks become profile sources.

use async_trait::async_trait;
use festcard_core::{FestcardError, Persona, Profile, ProfileGenerator, Result, Socials, Source};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

use crate::prompts::{self, NOT_FOUND_MARKER};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Generator that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiProfileGenerator {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProfileGenerator {
    /// Creates a generator with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Applies a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FestcardError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let url = format!(
            "{BASE_URL}/{model}:generateContent?key={api_key}",
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| FestcardError::Generation {
                message: format!("Gemini API request failed: {err}"),
                status_code: None,
                retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        response.json().await.map_err(|err| {
            FestcardError::generation(format!("Failed to parse Gemini response: {err}"))
        })
    }

    fn request(prompt: String) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: Some(Content {
                role: "system".to_string(),
                parts: vec![Part {
                    text: prompts::system_instruction().to_string(),
                }],
            }),
            generation_config: None,
            tools: None,
        }
    }
}

#[async_trait]
impl ProfileGenerator for GeminiProfileGenerator {
    async fn generate_persona_profile(&self, persona: Persona) -> Result<Profile> {
        let mut request = Self::request(prompts::persona_prompt(persona)?);
        request.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: Some(card_schema()),
        });

        tracing::debug!(model = %self.model, %persona, "requesting persona profile");
        let response = self.send_request(&request).await?;
        let text = extract_text_response(&response)?;
        let card = parse_card(&text)?;
        Ok(card.into_profile(persona, Vec::new()))
    }

    async fn search_public_profile(&self, query: &str) -> Result<Option<Profile>> {
        let mut request = Self::request(prompts::search_prompt(query)?);
        request.tools = Some(vec![json!({ "googleSearch": {} })]);

        tracing::debug!(model = %self.model, query, "searching public profile");
        let response = self.send_request(&request).await?;
        let text = extract_text_response(&response)?;
        if is_not_found(&text) {
            tracing::info!(query, "directory search found nothing");
            return Ok(None);
        }
        let card = parse_card(&text)?;
        Ok(Some(
            card.into_profile(Persona::Celebrity, extract_sources(&response)),
        ))
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentResponse>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize, Debug)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Deserialize, Debug)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// The card fields the model fills in.
#[derive(Deserialize, Debug)]
struct GeneratedCard {
    name: String,
    bio: String,
    #[serde(default)]
    socials: Socials,
}

impl GeneratedCard {
    fn into_profile(self, persona: Persona, sources: Vec<Source>) -> Profile {
        Profile::new(self.name.trim(), self.bio.trim(), persona)
            .with_socials(self.socials.instagram, self.socials.linkedin)
            .with_sources(sources)
    }
}

fn card_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "bio": { "type": "STRING" },
            "socials": {
                "type": "OBJECT",
                "properties": {
                    "instagram": { "type": "STRING" },
                    "linkedin": { "type": "STRING" }
                },
                "required": ["instagram", "linkedin"]
            }
        },
        "required": ["name", "bio", "socials"]
    })
}

// ============================================================================
// Response handling
// ============================================================================

fn extract_text_response(response: &GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .as_ref()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            FestcardError::generation("Gemini API returned no text in the response candidates")
        })
}

fn extract_sources(response: &GenerateContentResponse) -> Vec<Source> {
    let mut sources: Vec<Source> = Vec::new();
    let chunks = response
        .candidates
        .iter()
        .flatten()
        .filter_map(|c| c.grounding_metadata.as_ref())
        .flat_map(|m| m.grounding_chunks.iter())
        .filter_map(|chunk| chunk.web.as_ref());
    for web in chunks {
        let Some(uri) = web.uri.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };
        if sources.iter().any(|s| s.uri == uri) {
            continue;
        }
        sources.push(Source {
            uri: uri.to_string(),
            title: web.title.clone().unwrap_or_else(|| uri.to_string()),
        });
    }
    sources
}

fn is_not_found(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.contains('{') && trimmed.contains(NOT_FOUND_MARKER)
}

/// Parses a card from model output, tolerating markdown fences and chatter
/// around the JSON object.
fn parse_card(text: &str) -> Result<GeneratedCard> {
    let start = text.find('{');
    let end = text.rfind('}');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(FestcardError::generation(
                "Gemini response did not contain a JSON object",
            ));
        }
    };
    let card: GeneratedCard = serde_json::from_str(json).map_err(|e| {
        FestcardError::generation(format!("Gemini returned malformed profile JSON: {e}"))
    })?;
    if card.name.trim().is_empty() {
        return Err(FestcardError::generation("Gemini returned a profile without a name"));
    }
    Ok(card)
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> FestcardError {
    let mut message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    if let Some(delay) = retry_after {
        message = format!("{message} (retry after {}s)", delay.as_secs());
    }

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    FestcardError::Generation {
        message,
        status_code: Some(status.as_u16()),
        retryable,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date form is not handled
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
