// ABOUTME: Route handlers for the shared ingredient reference data
// ABOUTME: Standard CRUD over globally unique ingredient names, unscoped by owner
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Ingredient routes
//!
//! Ingredients are shared reference data: every user sees and edits the same
//! rows, and no authentication is required. Names are globally unique and
//! stored as given here; only the import and generation flows lowercase them.

use crate::errors::AppError;
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Request body for creating or renaming an ingredient
#[derive(Debug, Deserialize)]
pub struct IngredientBody {
    pub name: String,
}

/// Ingredient routes handler
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    #[must_use]
    pub fn routes(state: Arc<ServerState>) -> Router {
        Router::new()
            .route(
                "/api/ingredients",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/ingredients/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(state)
    }

    /// Handle GET /api/ingredients
    async fn handle_list(
        State(state): State<Arc<ServerState>>,
    ) -> Result<Response, AppError> {
        let ingredients = state.database.list_ingredients().await?;
        Ok((StatusCode::OK, Json(ingredients)).into_response())
    }

    /// Handle POST /api/ingredients
    async fn handle_create(
        State(state): State<Arc<ServerState>>,
        Json(body): Json<IngredientBody>,
    ) -> Result<Response, AppError> {
        let name = body.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Ingredient name may not be blank"));
        }

        let ingredient = state.database.create_ingredient(name).await?;
        Ok((StatusCode::CREATED, Json(ingredient)).into_response())
    }

    /// Handle GET /api/ingredients/:id
    async fn handle_get(
        State(state): State<Arc<ServerState>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let ingredient = state
            .database
            .get_ingredient(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {id}")))?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }

    /// Handle PUT /api/ingredients/:id
    async fn handle_update(
        State(state): State<Arc<ServerState>>,
        Path(id): Path<i64>,
        Json(body): Json<IngredientBody>,
    ) -> Result<Response, AppError> {
        let name = body.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_input("Ingredient name may not be blank"));
        }

        if !state.database.update_ingredient(id, name).await? {
            return Err(AppError::not_found(format!("Ingredient {id}")));
        }

        let ingredient = state
            .database
            .get_ingredient(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {id}")))?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }

    /// Handle DELETE /api/ingredients/:id
    async fn handle_delete(
        State(state): State<Arc<ServerState>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        if !state.database.delete_ingredient(id).await? {
            return Err(AppError::not_found(format!("Ingredient {id}")));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
