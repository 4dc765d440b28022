// ABOUTME: Route module organization for the Recipe Planner HTTP API
// ABOUTME: Composes per-resource routers and shared ownership-scoping helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Route modules for the Recipe Planner server
//!
//! Each domain module contains route definitions and thin handlers that
//! delegate to the storage layer. Ownership scoping is enforced here: acting
//! on another user's recipe or meal plan is an authorization failure (403),
//! deliberately distinct from a missing row (404).

/// Registration and login routes
pub mod auth;
/// Dietary preference reference data routes
pub mod dietary_preferences;
/// AI recipe generation route
pub mod generate;
/// Health check routes
pub mod health;
/// Ingredient reference data routes
pub mod ingredients;
/// Meal plan routes
pub mod meal_plans;
/// Recipe routes
pub mod recipes;
/// Shopping list item routes
pub mod shopping_list;

pub use auth::AuthRoutes;
pub use dietary_preferences::DietaryPreferenceRoutes;
pub use generate::GenerateRoutes;
pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use meal_plans::MealPlanRoutes;
pub use recipes::RecipeRoutes;
pub use shopping_list::ShoppingListRoutes;

use crate::errors::AppError;
use crate::models::{MealPlan, Recipe};
use crate::state::ServerState;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Build the full application router
#[must_use]
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(state.clone()))
        .merge(IngredientRoutes::routes(state.clone()))
        .merge(DietaryPreferenceRoutes::routes(state.clone()))
        .merge(RecipeRoutes::routes(state.clone()))
        .merge(MealPlanRoutes::routes(state.clone()))
        .merge(ShoppingListRoutes::routes(state.clone()))
        .merge(GenerateRoutes::routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Fetch a recipe and require that it belongs to the given user
pub(crate) async fn require_recipe_owned(
    state: &ServerState,
    recipe_id: i64,
    user_id: Uuid,
) -> Result<Recipe, AppError> {
    let recipe = state
        .database
        .get_recipe(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))?;

    if recipe.user_id != user_id {
        return Err(AppError::permission_denied(
            "Recipe belongs to another user",
        ));
    }
    Ok(recipe)
}

/// Fetch a meal plan and require that it belongs to the given user
pub(crate) async fn require_plan_owned(
    state: &ServerState,
    plan_id: i64,
    user_id: Uuid,
) -> Result<MealPlan, AppError> {
    let plan = state
        .database
        .get_meal_plan(plan_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Meal plan {plan_id}")))?;

    if plan.user_id != user_id {
        return Err(AppError::permission_denied(
            "Meal plan belongs to another user",
        ));
    }
    Ok(plan)
}
