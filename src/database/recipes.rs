// ABOUTME: Recipe storage queries including ingredient lines and preference links
// ABOUTME: Assembles nested recipe representations with owner, ingredients, and preferences
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::Database;
use crate::errors::AppError;
use crate::models::{NewRecipe, Recipe, RecipeDetail, RecipeIngredientLine, UserRef};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

fn row_to_recipe(row: &SqliteRow) -> Result<Recipe, AppError> {
    let user_id: String = row.try_get("user_id")?;

    Ok(Recipe {
        id: row.try_get("id")?,
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| AppError::database(format!("Corrupt recipe owner id {user_id}: {e}")))?,
        title: row.try_get("title")?,
        instructions: row.try_get("instructions")?,
        cooking_time_minutes: row.try_get("cooking_time_minutes")?,
        cuisine: row.try_get("cuisine")?,
        generated_by_ai: row.try_get("generated_by_ai")?,
    })
}

/// Insert a recipe row and return its id
///
/// # Errors
///
/// Returns a database error on query failure.
pub async fn insert_recipe(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    recipe: &NewRecipe,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r"
        INSERT INTO recipes (user_id, title, instructions, cooking_time_minutes, cuisine, generated_by_ai)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ",
    )
    .bind(user_id.to_string())
    .bind(&recipe.title)
    .bind(&recipe.instructions)
    .bind(recipe.cooking_time_minutes)
    .bind(&recipe.cuisine)
    .bind(recipe.generated_by_ai)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Attach an ingredient line to a recipe
///
/// The (recipe, ingredient) pair is unique; inserting the same ingredient
/// twice for one recipe is a constraint violation.
///
/// # Errors
///
/// Returns a database error on query failure, including unique violations.
pub async fn add_ingredient_line(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredient_id: i64,
    quantity: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO recipe_ingredients (recipe_id, ingredient_id, quantity)
        VALUES (?1, ?2, ?3)
        ",
    )
    .bind(recipe_id)
    .bind(ingredient_id)
    .bind(quantity)
    .execute(conn)
    .await?;

    Ok(())
}

/// Associate a dietary preference with a recipe (set semantics)
///
/// # Errors
///
/// Returns a database error on query failure.
pub async fn link_preference(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    preference_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO recipe_dietary_preferences (recipe_id, preference_id)
        VALUES (?1, ?2)
        ON CONFLICT DO NOTHING
        ",
    )
    .bind(recipe_id)
    .bind(preference_id)
    .execute(conn)
    .await?;

    Ok(())
}

impl Database {
    /// Fetch a recipe row regardless of owner (callers enforce scoping)
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_recipe(&self, id: i64) -> Result<Option<Recipe>, AppError> {
        let row = sqlx::query("SELECT * FROM recipes WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(row_to_recipe).transpose()
    }

    /// Fetch the nested representation of one recipe
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_recipe_detail(&self, id: i64) -> Result<Option<RecipeDetail>, AppError> {
        let Some(recipe) = self.get_recipe(id).await? else {
            return Ok(None);
        };

        Ok(Some(self.assemble_detail(recipe).await?))
    }

    /// List a user's recipes, newest first, fully nested
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list_recipes_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RecipeDetail>, AppError> {
        let rows = sqlx::query("SELECT * FROM recipes WHERE user_id = ?1 ORDER BY id DESC")
            .bind(user_id.to_string())
            .fetch_all(self.pool())
            .await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in &rows {
            let recipe = row_to_recipe(row)?;
            details.push(self.assemble_detail(recipe).await?);
        }
        Ok(details)
    }

    /// Overwrite a recipe's scalar fields; returns false when the id does
    /// not exist. The AI-origin flag is never changed here.
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn update_recipe(&self, id: i64, recipe: &NewRecipe) -> Result<bool, AppError> {
        let result = sqlx::query(
            r"
            UPDATE recipes
            SET title = ?1, instructions = ?2, cooking_time_minutes = ?3, cuisine = ?4
            WHERE id = ?5
            ",
        )
        .bind(&recipe.title)
        .bind(&recipe.instructions)
        .bind(recipe.cooking_time_minutes)
        .bind(&recipe.cuisine)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a recipe; join rows cascade
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn delete_recipe(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn assemble_detail(&self, recipe: Recipe) -> Result<RecipeDetail, AppError> {
        let owner = sqlx::query("SELECT username FROM users WHERE id = ?1")
            .bind(recipe.user_id.to_string())
            .fetch_one(self.pool())
            .await?;

        let lines = sqlx::query(
            r"
            SELECT ri.ingredient_id, i.name AS ingredient_name, ri.quantity
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = ?1
            ORDER BY ri.id
            ",
        )
        .bind(recipe.id)
        .fetch_all(self.pool())
        .await?;

        let preferences = sqlx::query(
            r"
            SELECT dp.name
            FROM recipe_dietary_preferences rdp
            JOIN dietary_preferences dp ON dp.id = rdp.preference_id
            WHERE rdp.recipe_id = ?1
            ORDER BY dp.id
            ",
        )
        .bind(recipe.id)
        .fetch_all(self.pool())
        .await?;

        Ok(RecipeDetail {
            id: recipe.id,
            user: UserRef {
                id: recipe.user_id,
                username: owner.get("username"),
            },
            title: recipe.title,
            instructions: recipe.instructions,
            cooking_time_minutes: recipe.cooking_time_minutes,
            cuisine: recipe.cuisine,
            dietary_preferences: preferences.into_iter().map(|row| row.get("name")).collect(),
            generated_by_ai: recipe.generated_by_ai,
            ingredients: lines
                .into_iter()
                .map(|row| RecipeIngredientLine {
                    ingredient_id: row.get("ingredient_id"),
                    ingredient_name: row.get("ingredient_name"),
                    quantity: row.get("quantity"),
                })
                .collect(),
        })
    }
}
