// ABOUTME: LLM provider abstraction for pluggable AI model integration
// ABOUTME: Defines the schema-constrained JSON generation contract used by recipe generation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # LLM Provider Interface
//!
//! Contract implemented by generation backends. The recipe generator only
//! needs one capability: turn a prompt plus a response schema into a JSON
//! document. Keeping the trait this narrow lets tests substitute a canned
//! backend without any network access.

mod gemini;

pub use gemini::GeminiClient;

use crate::errors::AppError;
use async_trait::async_trait;

/// A backend able to generate schema-constrained JSON from a prompt
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a JSON document matching `schema` from the prompt
    ///
    /// Returns the raw JSON text produced by the model; callers parse and
    /// validate it against their own domain types.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the service cannot be reached and a
    /// service error when it answers with a failure or an unusable envelope.
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AppError>;
}
