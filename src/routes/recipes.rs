// ABOUTME: Route handlers for owner-scoped recipe CRUD
// ABOUTME: Serves nested recipe representations and enforces ownership on reads and writes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Recipe routes
//!
//! All endpoints require authentication and act only on the requester's
//! recipes. Create/update accept scalar fields; ingredient lines are
//! populated by the import and generation flows.

use super::require_recipe_owned;
use crate::errors::AppError;
use crate::models::NewRecipe;
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Request body for creating a recipe
#[derive(Debug, Deserialize)]
pub struct CreateRecipeBody {
    pub title: String,
    pub instructions: String,
    #[serde(default)]
    pub cooking_time_minutes: Option<i64>,
    #[serde(default)]
    pub cuisine: Option<String>,
}

/// Request body for updating a recipe; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeBody {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub cooking_time_minutes: Option<i64>,
    pub cuisine: Option<String>,
}

/// Recipe routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    #[must_use]
    pub fn routes(state: Arc<ServerState>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(state)
    }

    /// Handle GET /api/recipes - list the requester's recipes, newest first
    async fn handle_list(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;

        let recipes = state.database.list_recipes_for_user(auth.user_id).await?;
        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    /// Handle POST /api/recipes
    async fn handle_create(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Json(body): Json<CreateRecipeBody>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;

        let recipe = NewRecipe {
            title: body.title,
            instructions: body.instructions,
            cooking_time_minutes: body.cooking_time_minutes,
            cuisine: body.cuisine,
            generated_by_ai: false,
        };
        if let Err(errors) = recipe.validate() {
            return Err(AppError::validation(
                "Recipe failed validation",
                errors.to_json(),
            ));
        }

        let mut conn = state.database.pool().acquire().await?;
        let recipe_id =
            crate::database::insert_recipe(&mut conn, auth.user_id, &recipe).await?;
        drop(conn);

        let detail = state
            .database
            .get_recipe_detail(recipe_id)
            .await?
            .ok_or_else(|| AppError::database("Inserted recipe vanished"))?;
        Ok((StatusCode::CREATED, Json(detail)).into_response())
    }

    /// Handle GET /api/recipes/:id
    async fn handle_get(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;
        require_recipe_owned(&state, id, auth.user_id).await?;

        let detail = state
            .database
            .get_recipe_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle PUT /api/recipes/:id - partial update of scalar fields
    async fn handle_update(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(body): Json<UpdateRecipeBody>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;
        let existing = require_recipe_owned(&state, id, auth.user_id).await?;

        let merged = NewRecipe {
            title: body.title.unwrap_or(existing.title),
            instructions: body.instructions.unwrap_or(existing.instructions),
            cooking_time_minutes: body.cooking_time_minutes.or(existing.cooking_time_minutes),
            cuisine: body.cuisine.or(existing.cuisine),
            generated_by_ai: existing.generated_by_ai,
        };
        if let Err(errors) = merged.validate() {
            return Err(AppError::validation(
                "Recipe failed validation",
                errors.to_json(),
            ));
        }

        if !state.database.update_recipe(id, &merged).await? {
            return Err(AppError::not_found(format!("Recipe {id}")));
        }

        let detail = state
            .database
            .get_recipe_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle DELETE /api/recipes/:id
    async fn handle_delete(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;
        require_recipe_owned(&state, id, auth.user_id).await?;

        state.database.delete_recipe(id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
