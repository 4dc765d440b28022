// ABOUTME: Data models for recipe management with shared reference data
// ABOUTME: Defines User, Recipe, Ingredient, DietaryPreference, MealPlan, and ShoppingListItem
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Domain models shared by the storage layer, the importers, and the routes.
//!
//! Scalar recipe validation lives here so the CRUD endpoints and the AI
//! recipe mapper reject the same shapes with the same per-field messages.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Maximum length of a recipe title
pub const MAX_TITLE_LEN: usize = 255;

/// Maximum length of a cuisine label
pub const MAX_CUISINE_LEN: usize = 100;

/// Quantity used when an ingredient line carries no parseable amount
pub const DEFAULT_QUANTITY: &str = "some";

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Unique login name
    pub username: String,
    /// Bcrypt password hash, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Whether the account may log in
    pub is_active: bool,
}

impl User {
    /// Create a new active user with a fresh UUID
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
            is_active: true,
        }
    }

    /// Public projection embedded in owned resources
    #[must_use]
    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Public user projection `{id, username}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub username: String,
}

/// Shared ingredient reference row, globally unique by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
}

/// Shared dietary preference row, globally unique by name
///
/// Names are capitalization-normalized on creation ("vegan" becomes "Vegan").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietaryPreference {
    pub id: i64,
    pub name: String,
}

/// A stored recipe row
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub instructions: String,
    pub cooking_time_minutes: Option<i64>,
    pub cuisine: Option<String>,
    pub generated_by_ai: bool,
}

/// Scalar fields for creating a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub instructions: String,
    #[serde(default)]
    pub cooking_time_minutes: Option<i64>,
    #[serde(default)]
    pub cuisine: Option<String>,
    /// Set by the backend, never by the caller
    #[serde(skip)]
    pub generated_by_ai: bool,
}

impl NewRecipe {
    /// Validate scalar fields against the domain schema
    ///
    /// # Errors
    ///
    /// Returns the per-field messages for every failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.add("title", "may not be blank");
        } else if self.title.chars().count() > MAX_TITLE_LEN {
            errors.add("title", "may not exceed 255 characters");
        }

        if self.instructions.trim().is_empty() {
            errors.add("instructions", "may not be blank");
        }

        if let Some(minutes) = self.cooking_time_minutes {
            if minutes < 0 {
                errors.add("cooking_time_minutes", "must be a non-negative integer");
            }
        }

        if let Some(cuisine) = &self.cuisine {
            if cuisine.chars().count() > MAX_CUISINE_LEN {
                errors.add("cuisine", "may not exceed 100 characters");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Field-keyed validation messages, serialized as `{"field": ["msg", ...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    /// Create an empty error set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// True when no field has failed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize into a JSON detail payload
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.0).unwrap_or(serde_json::Value::Null)
    }
}

/// One ingredient line of a recipe, with its join-row quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientLine {
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub quantity: String,
}

/// Fully nested recipe representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub user: UserRef,
    pub title: String,
    pub instructions: String,
    pub cooking_time_minutes: Option<i64>,
    pub cuisine: Option<String>,
    pub dietary_preferences: Vec<String>,
    pub generated_by_ai: bool,
    pub ingredients: Vec<RecipeIngredientLine>,
}

/// A stored meal plan row
#[derive(Debug, Clone)]
pub struct MealPlan {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Fully nested meal plan representation returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanDetail {
    pub id: i64,
    pub user: UserRef,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub recipes: Vec<RecipeDetail>,
}

/// A stored shopping list item row
#[derive(Debug, Clone)]
pub struct ShoppingListItem {
    pub id: i64,
    pub meal_plan_id: i64,
    pub ingredient_id: i64,
    pub quantity: String,
    pub is_checked: bool,
}

/// Shopping list item representation with the ingredient name embedded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListItemDetail {
    pub id: i64,
    pub meal_plan_id: i64,
    pub ingredient_id: i64,
    pub ingredient_name: String,
    pub quantity: String,
    pub is_checked: bool,
}

/// Capitalize a preference name the way the domain stores it:
/// first character uppercased, the rest lowercased.
#[must_use]
pub fn capitalize_preference(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
