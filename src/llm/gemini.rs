// ABOUTME: Google Gemini client for schema-constrained JSON generation
// ABOUTME: Wraps the generateContent endpoint and unwraps its candidate envelope
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Gemini Client
//!
//! Client for Google's Generative Language API. Requests are constrained to
//! JSON output via `generationConfig.responseMimeType` and `responseSchema`,
//! so the model answers with a single text part that parses as the caller's
//! target type.
//!
//! The API key comes from server configuration (`GEMINI_API_KEY`); the
//! client itself never reads the environment.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::LlmProvider;
use crate::errors::AppError;

/// Service name used in error messages
const SERVICE: &str = "Gemini";

/// Default generation model
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Base URL for the Generative Language API
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<TextPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

/// Google Gemini generation client
pub struct GeminiClient {
    api_key: String,
    client: Client,
    model: String,
}

impl GeminiClient {
    /// Create a client with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Override the generation model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_url(&self) -> String {
        format!(
            "{API_BASE_URL}/models/{}:generateContent?key={}",
            self.model, self.api_key
        )
    }

    /// Parse the response body and unwrap the first candidate's text part
    fn extract_text(body: &str) -> Result<String, AppError> {
        let response: GeminiResponse = serde_json::from_str(body).map_err(|e| {
            AppError::external_service(SERVICE, format!("Response is not valid JSON: {e}"))
        })?;

        if let Some(error) = response.error {
            return Err(AppError::external_service(SERVICE, error.message));
        }

        response
            .candidates
            .and_then(|mut candidates| {
                if candidates.is_empty() {
                    None
                } else {
                    candidates.swap_remove(0).content
                }
            })
            .and_then(|content| content.parts)
            .and_then(|mut parts| {
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.swap_remove(0).text)
                }
            })
            .ok_or_else(|| {
                AppError::external_service(SERVICE, "Response contained no generated content")
            })
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AppError> {
        let request = GeminiRequest {
            contents: vec![RequestContent {
                role: "user".to_owned(),
                parts: vec![TextPart {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_owned(),
                response_schema: schema.clone(),
            },
        };

        debug!(model = %self.model, "Sending generation request to Gemini");

        let response = self
            .client
            .post(self.build_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Gemini request failed");
                AppError::external_unavailable(SERVICE, format!("Request failed: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_unavailable(SERVICE, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            let message = serde_json::from_str::<GeminiResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map_or(body, |e| e.message);
            return Err(AppError::external_service(
                SERVICE,
                format!("API error ({status}): {message}"),
            ));
        }

        Self::extract_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_extract_text_from_envelope() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "[{\"title\": \"Soup\"}]"}], "role": "model"}}
            ]
        }"#;

        let text = GeminiClient::extract_text(body).unwrap();
        assert_eq!(text, "[{\"title\": \"Soup\"}]");
    }

    #[test]
    fn test_extract_text_surfaces_api_error() {
        let body = r#"{"error": {"message": "API key not valid"}}"#;
        let err = GeminiClient::extract_text(body).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
        assert!(err.message.contains("API key not valid"));
    }

    #[test]
    fn test_extract_text_rejects_empty_envelope() {
        let err = GeminiClient::extract_text(r#"{"candidates": []}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
    }

    #[test]
    fn test_extract_text_rejects_non_json() {
        let err = GeminiClient::extract_text("<html>oops</html>").unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
    }
}
