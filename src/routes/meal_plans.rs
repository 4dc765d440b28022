// ABOUTME: Route handlers for owner-scoped meal plan CRUD and membership management
// ABOUTME: Includes shopping list derivation from a plan's recipe ingredients
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Meal plan routes
//!
//! Meal plans are owner-scoped like recipes. Membership (`recipe_ids`) is
//! restricted to the caller's own recipes; naming another user's recipe is
//! an authorization failure.

use super::{require_plan_owned, require_recipe_owned};
use crate::errors::AppError;
use crate::state::ServerState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

/// Default plan name matching the original data model
const DEFAULT_PLAN_NAME: &str = "My Meal Plan";

/// Request body for creating a meal plan
#[derive(Debug, Deserialize)]
pub struct CreateMealPlanBody {
    #[serde(default)]
    pub name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub recipe_ids: Option<Vec<i64>>,
}

/// Request body for updating a meal plan; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateMealPlanBody {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub recipe_ids: Option<Vec<i64>>,
}

fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::invalid_input(
            "end_date may not be before start_date",
        ));
    }
    Ok(())
}

/// Meal plan routes handler
pub struct MealPlanRoutes;

impl MealPlanRoutes {
    /// Create all meal plan routes
    #[must_use]
    pub fn routes(state: Arc<ServerState>) -> Router {
        Router::new()
            .route(
                "/api/meal-plans",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/meal-plans/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/meal-plans/:id/shopping-list",
                post(Self::handle_derive_shopping_list),
            )
            .with_state(state)
    }

    async fn check_recipes_owned(
        state: &ServerState,
        recipe_ids: &[i64],
        user_id: uuid::Uuid,
    ) -> Result<(), AppError> {
        for recipe_id in recipe_ids {
            require_recipe_owned(state, *recipe_id, user_id).await?;
        }
        Ok(())
    }

    /// Handle GET /api/meal-plans - list the requester's plans
    async fn handle_list(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;

        let plans = state.database.list_meal_plans_for_user(auth.user_id).await?;
        Ok((StatusCode::OK, Json(plans)).into_response())
    }

    /// Handle POST /api/meal-plans
    async fn handle_create(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Json(body): Json<CreateMealPlanBody>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;

        check_date_range(body.start_date, body.end_date)?;

        let recipe_ids = body.recipe_ids.unwrap_or_default();
        Self::check_recipes_owned(&state, &recipe_ids, auth.user_id).await?;

        let name = body
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_PLAN_NAME);

        let plan_id = state
            .database
            .create_meal_plan(auth.user_id, name, body.start_date, body.end_date)
            .await?;
        state
            .database
            .set_meal_plan_recipes(plan_id, &recipe_ids)
            .await?;

        let detail = state
            .database
            .get_meal_plan_detail(plan_id)
            .await?
            .ok_or_else(|| AppError::database("Inserted meal plan vanished"))?;
        Ok((StatusCode::CREATED, Json(detail)).into_response())
    }

    /// Handle GET /api/meal-plans/:id
    async fn handle_get(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;
        require_plan_owned(&state, id, auth.user_id).await?;

        let detail = state
            .database
            .get_meal_plan_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Meal plan {id}")))?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle PUT /api/meal-plans/:id - partial update
    async fn handle_update(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(body): Json<UpdateMealPlanBody>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;
        let existing = require_plan_owned(&state, id, auth.user_id).await?;

        let name = body
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or(existing.name, str::to_owned);
        let start_date = body.start_date.unwrap_or(existing.start_date);
        let end_date = body.end_date.unwrap_or(existing.end_date);
        check_date_range(start_date, end_date)?;

        state
            .database
            .update_meal_plan(id, &name, start_date, end_date)
            .await?;

        if let Some(recipe_ids) = body.recipe_ids {
            Self::check_recipes_owned(&state, &recipe_ids, auth.user_id).await?;
            state.database.set_meal_plan_recipes(id, &recipe_ids).await?;
        }

        let detail = state
            .database
            .get_meal_plan_detail(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Meal plan {id}")))?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    }

    /// Handle DELETE /api/meal-plans/:id
    async fn handle_delete(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;
        require_plan_owned(&state, id, auth.user_id).await?;

        state.database.delete_meal_plan(id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/meal-plans/:id/shopping-list
    ///
    /// Materializes unchecked shopping list items from the plan's recipes,
    /// one per distinct ingredient, skipping ingredients already listed.
    async fn handle_derive_shopping_list(
        State(state): State<Arc<ServerState>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let auth = state.auth.authenticate(&headers)?;
        require_plan_owned(&state, id, auth.user_id).await?;

        let items = state.database.derive_shopping_list(id).await?;
        Ok((StatusCode::CREATED, Json(items)).into_response())
    }
}
