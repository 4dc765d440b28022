// ABOUTME: Shopping list item storage queries scoped through the owning meal plan
// ABOUTME: Includes derivation of list items from a plan's recipe ingredients
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::Database;
use crate::errors::AppError;
use crate::models::{ShoppingListItem, ShoppingListItemDetail};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashSet;
use uuid::Uuid;

fn row_to_detail(row: &SqliteRow) -> Result<ShoppingListItemDetail, AppError> {
    Ok(ShoppingListItemDetail {
        id: row.try_get("id")?,
        meal_plan_id: row.try_get("meal_plan_id")?,
        ingredient_id: row.try_get("ingredient_id")?,
        ingredient_name: row.try_get("ingredient_name")?,
        quantity: row.try_get("quantity")?,
        is_checked: row.try_get("is_checked")?,
    })
}

impl Database {
    /// List every shopping list item across a user's meal plans
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list_shopping_items_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ShoppingListItemDetail>, AppError> {
        let rows = sqlx::query(
            r"
            SELECT sli.id, sli.meal_plan_id, sli.ingredient_id, i.name AS ingredient_name,
                   sli.quantity, sli.is_checked
            FROM shopping_list_items sli
            JOIN meal_plans mp ON mp.id = sli.meal_plan_id
            JOIN ingredients i ON i.id = sli.ingredient_id
            WHERE mp.user_id = ?1
            ORDER BY sli.id
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(row_to_detail).collect()
    }

    /// List a plan's shopping list items
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list_shopping_items_for_plan(
        &self,
        plan_id: i64,
    ) -> Result<Vec<ShoppingListItemDetail>, AppError> {
        let rows = sqlx::query(
            r"
            SELECT sli.id, sli.meal_plan_id, sli.ingredient_id, i.name AS ingredient_name,
                   sli.quantity, sli.is_checked
            FROM shopping_list_items sli
            JOIN ingredients i ON i.id = sli.ingredient_id
            WHERE sli.meal_plan_id = ?1
            ORDER BY sli.id
            ",
        )
        .bind(plan_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(row_to_detail).collect()
    }

    /// Insert a shopping list item and return its nested representation
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn create_shopping_item(
        &self,
        meal_plan_id: i64,
        ingredient_id: i64,
        quantity: &str,
        is_checked: bool,
    ) -> Result<ShoppingListItemDetail, AppError> {
        let result = sqlx::query(
            r"
            INSERT INTO shopping_list_items (meal_plan_id, ingredient_id, quantity, is_checked)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(meal_plan_id)
        .bind(ingredient_id)
        .bind(quantity)
        .bind(is_checked)
        .execute(self.pool())
        .await?;

        self.get_shopping_item_detail(result.last_insert_rowid())
            .await?
            .ok_or_else(|| AppError::database("Inserted shopping list item vanished"))
    }

    /// Fetch a shopping list item row
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_shopping_item(&self, id: i64) -> Result<Option<ShoppingListItem>, AppError> {
        let row = sqlx::query("SELECT * FROM shopping_list_items WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(match row {
            Some(row) => Some(ShoppingListItem {
                id: row.try_get("id")?,
                meal_plan_id: row.try_get("meal_plan_id")?,
                ingredient_id: row.try_get("ingredient_id")?,
                quantity: row.try_get("quantity")?,
                is_checked: row.try_get("is_checked")?,
            }),
            None => None,
        })
    }

    /// Fetch a shopping list item with the ingredient name embedded
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_shopping_item_detail(
        &self,
        id: i64,
    ) -> Result<Option<ShoppingListItemDetail>, AppError> {
        let row = sqlx::query(
            r"
            SELECT sli.id, sli.meal_plan_id, sli.ingredient_id, i.name AS ingredient_name,
                   sli.quantity, sli.is_checked
            FROM shopping_list_items sli
            JOIN ingredients i ON i.id = sli.ingredient_id
            WHERE sli.id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(row_to_detail).transpose()
    }

    /// Update an item's quantity and checked state; returns false when the
    /// id does not exist
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn update_shopping_item(
        &self,
        id: i64,
        quantity: &str,
        is_checked: bool,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE shopping_list_items SET quantity = ?1, is_checked = ?2 WHERE id = ?3",
        )
        .bind(quantity)
        .bind(is_checked)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an item; returns false when the id does not exist
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn delete_shopping_item(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM shopping_list_items WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Materialize unchecked items from the plan's recipe ingredients
    ///
    /// One item per distinct ingredient across the plan's recipes; the first
    /// line seen supplies the quantity. Ingredients already on the plan's
    /// list are left untouched. Returns the plan's full item list.
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn derive_shopping_list(
        &self,
        plan_id: i64,
    ) -> Result<Vec<ShoppingListItemDetail>, AppError> {
        let mut tx = self.begin().await?;

        let existing = sqlx::query(
            "SELECT ingredient_id FROM shopping_list_items WHERE meal_plan_id = ?1",
        )
        .bind(plan_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut seen: HashSet<i64> = existing
            .into_iter()
            .map(|row| row.get("ingredient_id"))
            .collect();

        let lines = sqlx::query(
            r"
            SELECT ri.ingredient_id, ri.quantity
            FROM meal_plan_recipes mpr
            JOIN recipe_ingredients ri ON ri.recipe_id = mpr.recipe_id
            WHERE mpr.meal_plan_id = ?1
            ORDER BY mpr.recipe_id, ri.id
            ",
        )
        .bind(plan_id)
        .fetch_all(&mut *tx)
        .await?;

        for line in lines {
            let ingredient_id: i64 = line.get("ingredient_id");
            if !seen.insert(ingredient_id) {
                continue;
            }
            let quantity: String = line.get("quantity");
            sqlx::query(
                r"
                INSERT INTO shopping_list_items (meal_plan_id, ingredient_id, quantity, is_checked)
                VALUES (?1, ?2, ?3, FALSE)
                ",
            )
            .bind(plan_id)
            .bind(ingredient_id)
            .bind(&quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.list_shopping_items_for_plan(plan_id).await
    }
}
