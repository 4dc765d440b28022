// ABOUTME: Shared reference data queries for ingredients and dietary preferences
// ABOUTME: Provides CRUD plus race-tolerant get-or-create keyed on unique names
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Shared reference data: ingredients and dietary preferences.
//!
//! Both tables use the name as a global natural key. The get-or-create
//! helpers are upsert-shaped (`INSERT ... ON CONFLICT DO NOTHING` followed by
//! a SELECT) so concurrent importers fall back to the existing row instead of
//! erroring.

use super::Database;
use crate::errors::AppError;
use crate::models::{capitalize_preference, DietaryPreference, Ingredient};
use sqlx::{Row, SqliteConnection};

impl Database {
    /// List all ingredients
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, AppError> {
        let rows = sqlx::query("SELECT id, name FROM ingredients ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Ingredient {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Create an ingredient with the name stored as given
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the name already exists.
    pub async fn create_ingredient(&self, name: &str) -> Result<Ingredient, AppError> {
        let result = sqlx::query("INSERT INTO ingredients (name) VALUES (?1)")
            .bind(name)
            .execute(self.pool())
            .await?;

        Ok(Ingredient {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
        })
    }

    /// Look up an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_ingredient(&self, id: i64) -> Result<Option<Ingredient>, AppError> {
        let row = sqlx::query("SELECT id, name FROM ingredients WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|row| Ingredient {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    /// Rename an ingredient; returns false when the id does not exist
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the new name is taken.
    pub async fn update_ingredient(&self, id: i64, name: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE ingredients SET name = ?1 WHERE id = ?2")
            .bind(name)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an ingredient; returns false when the id does not exist
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn delete_ingredient(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all dietary preferences
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list_preferences(&self) -> Result<Vec<DietaryPreference>, AppError> {
        let rows = sqlx::query("SELECT id, name FROM dietary_preferences ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| DietaryPreference {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Create a dietary preference, capitalization-normalizing the name
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the normalized name already exists.
    pub async fn create_preference(&self, name: &str) -> Result<DietaryPreference, AppError> {
        let name = capitalize_preference(name.trim());
        let result = sqlx::query("INSERT INTO dietary_preferences (name) VALUES (?1)")
            .bind(&name)
            .execute(self.pool())
            .await?;

        Ok(DietaryPreference {
            id: result.last_insert_rowid(),
            name,
        })
    }

    /// Look up a dietary preference by id
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_preference(&self, id: i64) -> Result<Option<DietaryPreference>, AppError> {
        let row = sqlx::query("SELECT id, name FROM dietary_preferences WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.map(|row| DietaryPreference {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    /// Rename a dietary preference; returns false when the id does not exist
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the new name is taken.
    pub async fn update_preference(&self, id: i64, name: &str) -> Result<bool, AppError> {
        let name = capitalize_preference(name.trim());
        let result = sqlx::query("UPDATE dietary_preferences SET name = ?1 WHERE id = ?2")
            .bind(&name)
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a dietary preference; returns false when the id does not exist
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn delete_preference(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM dietary_preferences WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Get or create an ingredient by its lowercased name
///
/// The name is trimmed and lowercased before lookup, matching the import and
/// generation flows. Tolerates concurrent creation by re-reading after the
/// conflict-ignoring insert.
///
/// # Errors
///
/// Returns a database error on query failure.
pub async fn get_or_create_ingredient(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Ingredient, sqlx::Error> {
    let name = name.trim().to_lowercase();

    sqlx::query("INSERT INTO ingredients (name) VALUES (?1) ON CONFLICT(name) DO NOTHING")
        .bind(&name)
        .execute(&mut *conn)
        .await?;

    let row = sqlx::query("SELECT id, name FROM ingredients WHERE name = ?1")
        .bind(&name)
        .fetch_one(&mut *conn)
        .await?;

    Ok(Ingredient {
        id: row.get("id"),
        name: row.get("name"),
    })
}

/// Get or create a dietary preference by its capitalized name
///
/// # Errors
///
/// Returns a database error on query failure.
pub async fn get_or_create_preference(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<DietaryPreference, sqlx::Error> {
    let name = capitalize_preference(name.trim());

    sqlx::query("INSERT INTO dietary_preferences (name) VALUES (?1) ON CONFLICT(name) DO NOTHING")
        .bind(&name)
        .execute(&mut *conn)
        .await?;

    let row = sqlx::query("SELECT id, name FROM dietary_preferences WHERE name = ?1")
        .bind(&name)
        .fetch_one(&mut *conn)
        .await?;

    Ok(DietaryPreference {
        id: row.get("id"),
        name: row.get("name"),
    })
}
