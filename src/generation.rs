// ABOUTME: AI recipe generation service mapping Gemini responses onto the domain model
// ABOUTME: Builds prompts, validates generated recipes, and persists batches atomically
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # AI Recipe Mapper
//!
//! Translates a user's generation request into a schema-constrained Gemini
//! call and materializes the returned recipe array as owned recipe rows.
//!
//! The whole response array is one atomic persistence unit: the first recipe
//! that fails domain validation aborts the batch and nothing is committed,
//! including recipes that validated earlier in array order.

use crate::database::{
    add_ingredient_line, get_or_create_ingredient, get_or_create_preference, insert_recipe,
    link_preference, Database,
};
use crate::errors::AppError;
use crate::llm::LlmProvider;
use crate::models::{NewRecipe, RecipeDetail, User};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

fn default_num_recipes() -> u32 {
    1
}

/// A user's recipe generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRecipesRequest {
    /// Comma-separated seed ingredients
    #[serde(default)]
    pub ingredients: String,
    /// Comma-separated dietary preference names
    #[serde(default)]
    pub dietary_preferences: String,
    /// Target cooking time in minutes, free text
    #[serde(default)]
    pub cooking_time: String,
    /// Target cuisine, free text
    #[serde(default)]
    pub cuisine: String,
    /// How many recipes to generate
    #[serde(default = "default_num_recipes")]
    pub num_recipes: u32,
}

/// One ingredient object of a generated recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedIngredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
}

/// One recipe object parsed from the generation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub cooking_time_minutes: Option<i64>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<GeneratedIngredient>,
}

/// Build the natural-language instruction for the generation request
#[must_use]
pub fn build_prompt(request: &GenerateRecipesRequest) -> String {
    let mut prompt = format!(
        "Generate {} unique recipe(s) in JSON format. \
         Each recipe should have 'title', 'instructions' (step-by-step), \
         'cooking_time_minutes' (integer), 'cuisine', and 'ingredients' (an array of objects, \
         each with 'name' and 'quantity').\n\n",
        request.num_recipes
    );

    if !request.ingredients.is_empty() {
        prompt.push_str(&format!(
            "Use these main ingredients: {}.\n",
            request.ingredients
        ));
    }
    if !request.dietary_preferences.is_empty() {
        prompt.push_str(&format!(
            "Adhere to these dietary preferences: {}.\n",
            request.dietary_preferences
        ));
    }
    if !request.cooking_time.is_empty() {
        prompt.push_str(&format!(
            "Aim for a cooking time around {} minutes.\n",
            request.cooking_time
        ));
    }
    if !request.cuisine.is_empty() {
        prompt.push_str(&format!("Focus on {} cuisine.\n", request.cuisine));
    }
    prompt.push_str("Ensure the JSON is valid and only contains the recipe data.");

    prompt
}

/// JSON schema constraining the generation response shape
#[must_use]
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": {"type": "STRING"},
                "instructions": {"type": "STRING"},
                "cooking_time_minutes": {"type": "INTEGER"},
                "cuisine": {"type": "STRING"},
                "ingredients": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": {"type": "STRING"},
                            "quantity": {"type": "STRING"}
                        },
                        "propertyOrdering": ["name", "quantity"]
                    }
                }
            },
            "propertyOrdering": [
                "title", "instructions", "cooking_time_minutes", "cuisine", "ingredients"
            ]
        }
    })
}

/// Recipe generation service
pub struct RecipeGenerator {
    database: Database,
    provider: Arc<dyn LlmProvider>,
}

impl RecipeGenerator {
    /// Create a generator over a database and an LLM backend
    #[must_use]
    pub fn new(database: Database, provider: Arc<dyn LlmProvider>) -> Self {
        Self { database, provider }
    }

    /// Generate recipes for a user and persist the accepted batch
    ///
    /// # Errors
    ///
    /// Returns a service error when the generation call or its envelope
    /// fails, and a validation error (with the offending recipe and fields)
    /// when any generated recipe does not fit the domain schema. No recipes
    /// are persisted in either case.
    pub async fn generate(
        &self,
        user: &User,
        request: &GenerateRecipesRequest,
    ) -> Result<Vec<RecipeDetail>, AppError> {
        let prompt = build_prompt(request);
        let schema = response_schema();

        let text = self.provider.generate_json(&prompt, &schema).await?;

        let recipes: Vec<GeneratedRecipe> = serde_json::from_str(&text).map_err(|e| {
            AppError::external_service(
                "Gemini",
                format!("Generated text is not a valid recipe array: {e}"),
            )
        })?;

        info!(
            user = %user.username,
            count = recipes.len(),
            "Persisting generated recipe batch"
        );

        let ids = self
            .persist_batch(user.id, &recipes, &request.dietary_preferences)
            .await?;

        let mut details = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(detail) = self.database.get_recipe_detail(id).await? {
                details.push(detail);
            }
        }
        Ok(details)
    }

    /// Persist a parsed recipe batch atomically, returning the new recipe ids
    ///
    /// The caller-supplied preference list (comma-separated) is resolved once
    /// and attached to every recipe of the batch.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first failing recipe and its
    /// fields; the transaction is rolled back and nothing persists.
    pub async fn persist_batch(
        &self,
        user_id: Uuid,
        recipes: &[GeneratedRecipe],
        preferences_input: &str,
    ) -> Result<Vec<i64>, AppError> {
        let mut tx = self.database.begin().await?;

        let mut preference_ids = Vec::new();
        for name in preferences_input.split(',') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let preference = get_or_create_preference(&mut tx, name).await?;
            preference_ids.push(preference.id);
        }

        let mut recipe_ids = Vec::with_capacity(recipes.len());

        for (index, generated) in recipes.iter().enumerate() {
            // Resolve shared ingredients first, then validate scalars; a
            // failure here rolls the whole transaction back.
            let mut lines = Vec::with_capacity(generated.ingredients.len());
            for ingredient in &generated.ingredients {
                if ingredient.name.trim().is_empty() {
                    warn!(recipe_index = index, "Skipping generated ingredient without a name");
                    continue;
                }
                let row =
                    get_or_create_ingredient(&mut tx, &ingredient.name.to_lowercase()).await?;
                lines.push((row.id, ingredient.quantity.clone()));
            }

            let recipe = NewRecipe {
                title: generated.title.clone(),
                instructions: generated.instructions.clone(),
                cooking_time_minutes: generated.cooking_time_minutes,
                cuisine: generated.cuisine.clone(),
                generated_by_ai: true,
            };

            if let Err(errors) = recipe.validate() {
                return Err(AppError::validation(
                    "Failed to validate generated recipe data",
                    json!({
                        "recipe_index": index,
                        "title": generated.title,
                        "errors": errors.to_json(),
                    }),
                ));
            }

            let recipe_id = insert_recipe(&mut tx, user_id, &recipe).await?;

            for (ingredient_id, quantity) in &lines {
                add_ingredient_line(&mut tx, recipe_id, *ingredient_id, quantity).await?;
            }
            for preference_id in &preference_ids {
                link_preference(&mut tx, recipe_id, *preference_id).await?;
            }

            recipe_ids.push(recipe_id);
        }

        tx.commit().await?;
        Ok(recipe_ids)
    }
}
