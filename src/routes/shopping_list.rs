// ABOUTME: Route handlers for shopping list items scoped through the owning meal plan
// ABOUTME: Rejects writes against meal plans the requester does not own
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Shopping list item routes
//!
//! Items have no direct owner; every check walks through the owning meal
//! plan. Creating an item on another user's plan is an authorization
//! failure, not a validation error.

use super::require_plan_owned;
use crate::errors::AppError;
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Request body for creating a shopping list item
#[derive(Debug, Deserialize)]
pub struct CreateShoppingItemBody {
    pub meal_plan_id: i64,
    pub ingredient_id: i64,
    pub quantity: String,
    #[serde(default)]
    pub is_checked: bool,
}

/// Request body for updating an item; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateShoppingItemBody {
    pub quantity: Option<String>,
    pub is_checked: Option<bool>,
}

/// Shopping list item routes handler
pub struct ShoppingListRoutes;

impl ShoppingListRoutes {
    /// Create all shopping list item routes
    #[must_use]
    pub fn routes(state: Arc<ServerState>) -> Router {
        Router::new()
            .route(
                "/api/shopping-list-items",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/shopping-list-items/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(state)
    }

    /// Handle GET /api/shopping-list-items - items across the user's plans
    async fn handle_list(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;

        let items = state
            .database
            .list_shopping_items_for_user(auth.user_id)
            .await?;
        Ok((StatusCode::OK, Json(items)).into_response())
    }

    /// Handle POST /api/shopping-list-items
    async fn handle_create(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Json(body): Json<CreateShoppingItemBody>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;

        // Plan ownership first: only the plan's owner may add items
        require_plan_owned(&state, body.meal_plan_id, auth.user_id).await?;

        state
            .database
            .get_ingredient(body.ingredient_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {}", body.ingredient_id)))?;

        if body.quantity.trim().is_empty() {
            return Err(AppError::invalid_input("Quantity may not be blank"));
        }

        let item = state
            .database
            .create_shopping_item(
                body.meal_plan_id,
                body.ingredient_id,
                body.quantity.trim(),
                body.is_checked,
            )
            .await?;
        Ok((StatusCode::CREATED, Json(item)).into_response())
    }

    /// Handle GET /api/shopping-list-items/:id
    async fn handle_get(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;

        let item = state
            .database
            .get_shopping_item(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shopping list item {id}")))?;
        require_plan_owned(&state, item.meal_plan_id, auth.user_id).await?;

        let detail = state
            .database
            .get_shopping_item_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shopping list item {id}")))?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle PUT /api/shopping-list-items/:id - partial update
    async fn handle_update(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(body): Json<UpdateShoppingItemBody>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;

        let item = state
            .database
            .get_shopping_item(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shopping list item {id}")))?;
        require_plan_owned(&state, item.meal_plan_id, auth.user_id).await?;

        let quantity = match body.quantity {
            Some(quantity) => {
                if quantity.trim().is_empty() {
                    return Err(AppError::invalid_input("Quantity may not be blank"));
                }
                quantity.trim().to_owned()
            }
            None => item.quantity,
        };
        let is_checked = body.is_checked.unwrap_or(item.is_checked);

        state
            .database
            .update_shopping_item(id, &quantity, is_checked)
            .await?;

        let detail = state
            .database
            .get_shopping_item_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shopping list item {id}")))?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle DELETE /api/shopping-list-items/:id
    async fn handle_delete(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;

        let item = state
            .database
            .get_shopping_item(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Shopping list item {id}")))?;
        require_plan_owned(&state, item.meal_plan_id, auth.user_id).await?;

        state.database.delete_shopping_item(id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
