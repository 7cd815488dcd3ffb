//! Gemini REST client.

use super::{GenerateError, GenerationClient};
use crate::compose::SYSTEM_INSTRUCTION;
use crate::config::GenerationConfig;
use crate::stage::StageId;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationSettings,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationSettings {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
    }
}

/// Generation client backed by the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    config: GenerationConfig,
}

impl GeminiClient {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerateError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GenerateError::Unknown(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, stage: StageId, prompt: &str) -> Result<String, GenerateError> {
        // The key is resolved per call so a fix in the environment takes
        // effect without recreating the client.
        let api_key = self
            .config
            .resolve_api_key()
            .ok_or(GenerateError::CredentialsMissing)?;

        let request = GenerateContentRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationSettings {
                temperature: self.config.temperature,
            },
        };

        let url = format!("{API_BASE}/{}:generateContent", self.config.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport)?;

        match response.status() {
            StatusCode::OK => {
                let body: GenerateContentResponse = response
                    .json()
                    .await
                    .map_err(|e| GenerateError::Unknown(format!("failed to parse response: {e}")))?;
                body.into_text()
                    .ok_or_else(|| GenerateError::Unknown(format!("empty response for stage {stage}")))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(GenerateError::AuthFailed(error_body(response).await))
            }
            StatusCode::BAD_REQUEST => {
                // Gemini reports an invalid key as a 400 rather than a 401.
                let detail = error_body(response).await;
                if detail.to_lowercase().contains("api key") {
                    Err(GenerateError::AuthFailed(detail))
                } else {
                    Err(GenerateError::Unknown(detail))
                }
            }
            status => Err(GenerateError::Unknown(format!(
                "API error {status}: {}",
                error_body(response).await
            ))),
        }
    }
}

async fn error_body(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}

fn classify_transport(err: reqwest::Error) -> GenerateError {
    if err.is_timeout() || err.is_connect() {
        GenerateError::Network(err.to_string())
    } else {
        GenerateError::Unknown(err.to_string())
    }
}
