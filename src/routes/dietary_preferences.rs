// ABOUTME: Route handlers for the shared dietary preference reference data
// ABOUTME: Standard CRUD with capitalization-normalized unique names, unscoped by owner
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Dietary preference routes
//!
//! Preferences are shared reference data like ingredients, served without
//! authentication. Names are capitalization-normalized on creation and
//! update ("vegan" becomes "Vegan"), matching the import and generation
//! flows.

use crate::errors::AppError;
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Request body for creating or renaming a dietary preference
#[derive(Debug, Deserialize)]
pub struct DietaryPreferenceBody {
    pub name: String,
}

/// Dietary preference routes handler
pub struct DietaryPreferenceRoutes;

impl DietaryPreferenceRoutes {
    /// Create all dietary preference routes
    #[must_use]
    pub fn routes(state: Arc<ServerState>) -> Router {
        Router::new()
            .route(
                "/api/dietary-preferences",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/dietary-preferences/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(state)
    }

    /// Handle GET /api/dietary-preferences
    async fn handle_list(
        State(state): State<Arc<ServerState>>,
    ) -> Result<Response, AppError> {
        let preferences = state.database.list_preferences().await?;
        Ok((StatusCode::OK, Json(preferences)).into_response())
    }

    /// Handle POST /api/dietary-preferences
    async fn handle_create(
        State(state): State<Arc<ServerState>>,
        Json(body): Json<DietaryPreferenceBody>,
    ) -> Result<Response, AppError> {
        if body.name.trim().is_empty() {
            return Err(AppError::invalid_input(
                "Dietary preference name may not be blank",
            ));
        }

        let preference = state.database.create_preference(&body.name).await?;
        Ok((StatusCode::CREATED, Json(preference)).into_response())
    }

    /// Handle GET /api/dietary-preferences/:id
    async fn handle_get(
        State(state): State<Arc<ServerState>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let preference = state
            .database
            .get_preference(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Dietary preference {id}")))?;
        Ok((StatusCode::OK, Json(preference)).into_response())
    }

    /// Handle PUT /api/dietary-preferences/:id
    async fn handle_update(
        State(state): State<Arc<ServerState>>,
        Path(id): Path<i64>,
        Json(body): Json<DietaryPreferenceBody>,
    ) -> Result<Response, AppError> {
        if body.name.trim().is_empty() {
            return Err(AppError::invalid_input(
                "Dietary preference name may not be blank",
            ));
        }

        if !state.database.update_preference(id, &body.name).await? {
            return Err(AppError::not_found(format!("Dietary preference {id}")));
        }

        let preference = state
            .database
            .get_preference(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Dietary preference {id}")))?;
        Ok((StatusCode::OK, Json(preference)).into_response())
    }

    /// Handle DELETE /api/dietary-preferences/:id
    async fn handle_delete(
        State(state): State<Arc<ServerState>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        if !state.database.delete_preference(id).await? {
            return Err(AppError::not_found(format!("Dietary preference {id}")));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
