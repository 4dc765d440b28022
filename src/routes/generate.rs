// ABOUTME: Route handler proxying recipe generation through the configured LLM backend
// ABOUTME: Persists accepted batches and returns the created recipes fully nested
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Recipe generation route
//!
//! `POST /api/generate-recipe` forwards the caller's constraints to the
//! generation backend and returns the persisted batch. Without a configured
//! credential the endpoint answers with a configuration error and no side
//! effects.

use crate::errors::AppError;
use crate::generation::{GenerateRecipesRequest, RecipeGenerator};
use crate::state::ServerState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::sync::Arc;

/// Generation routes handler
pub struct GenerateRoutes;

impl GenerateRoutes {
    /// Create the generation route
    #[must_use]
    pub fn routes(state: Arc<ServerState>) -> Router {
        Router::new()
            .route("/api/generate-recipe", post(Self::handle_generate))
            .with_state(state)
    }

    /// Handle POST /api/generate-recipe
    async fn handle_generate(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Json(body): Json<GenerateRecipesRequest>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;

        let user = state
            .database
            .get_user(auth.user_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Token user no longer exists"))?;

        let provider = state
            .llm
            .clone()
            .ok_or_else(|| AppError::config("Gemini API key not configured on the server"))?;

        let generator = RecipeGenerator::new(state.database.clone(), provider);
        let recipes = generator.generate(&user, &body).await?;

        Ok((StatusCode::CREATED, Json(recipes)).into_response())
    }
}
