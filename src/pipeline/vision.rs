//! Vision-model collaborator.
//!
//! The pipeline core never talks HTTP itself; it consumes the raw response
//! string through the [`VisionModel`] trait, which also keeps the tests
//! free of a running model.

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::prompt::{MASTER_PROMPT, SYSTEM_PROMPT};
use super::ExtractionError;
use crate::config;

/// A model that turns a drawing image into a raw text response.
pub trait VisionModel {
    fn analyze_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Ollama HTTP client for local vision-language inference.
pub struct OllamaVisionClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaVisionClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default local Ollama instance with the default vision model.
    pub fn default_local() -> Self {
        Self::new(
            config::DEFAULT_OLLAMA_URL,
            config::DEFAULT_VISION_MODEL,
            config::VISION_TIMEOUT_SECS,
        )
    }

    /// List models available on the endpoint.
    pub fn list_models(&self) -> Result<Vec<String>, ExtractionError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() {
                ExtractionError::ModelConnection(self.base_url.clone())
            } else {
                ExtractionError::HttpClient(e.to_string())
            }
        })?;

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| ExtractionError::JsonParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }

    pub fn is_model_available(&self) -> Result<bool, ExtractionError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(&self.model)))
    }
}

/// Request body for Ollama /api/generate with an image attachment.
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    images: Vec<String>,
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl VisionModel for OllamaVisionClient {
    fn analyze_image(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        let url = format!("{}/api/generate", self.base_url);
        let encoded = base64::engine::general_purpose::STANDARD.encode(image_bytes);

        tracing::info!(
            model = %self.model,
            image_bytes = image_bytes.len(),
            "Sending drawing to vision model"
        );

        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt: MASTER_PROMPT,
            system: SYSTEM_PROMPT,
            images: vec![encoded],
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                ExtractionError::ModelConnection(self.base_url.clone())
            } else if e.is_timeout() {
                ExtractionError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                ExtractionError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::ModelError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| ExtractionError::JsonParsing(e.to_string()))?;

        Ok(parsed.response)
    }
}
