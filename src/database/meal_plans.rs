// ABOUTME: Meal plan storage queries including recipe membership management
// ABOUTME: Assembles nested meal plan representations with their recipes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::Database;
use crate::errors::AppError;
use crate::models::{MealPlan, MealPlanDetail, UserRef};
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

fn row_to_meal_plan(row: &SqliteRow) -> Result<MealPlan, AppError> {
    let user_id: String = row.try_get("user_id")?;

    Ok(MealPlan {
        id: row.try_get("id")?,
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| AppError::database(format!("Corrupt plan owner id {user_id}: {e}")))?,
        name: row.try_get("name")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
    })
}

impl Database {
    /// Insert a meal plan row and return it
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn create_meal_plan(
        &self,
        user_id: Uuid,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<i64, AppError> {
        let result = sqlx::query(
            r"
            INSERT INTO meal_plans (user_id, name, start_date, end_date)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(user_id.to_string())
        .bind(name)
        .bind(start_date)
        .bind(end_date)
        .execute(self.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Fetch a meal plan row regardless of owner (callers enforce scoping)
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_meal_plan(&self, id: i64) -> Result<Option<MealPlan>, AppError> {
        let row = sqlx::query("SELECT * FROM meal_plans WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(row_to_meal_plan).transpose()
    }

    /// List a user's meal plans, most recent start date first, fully nested
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn list_meal_plans_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MealPlanDetail>, AppError> {
        let rows = sqlx::query(
            "SELECT * FROM meal_plans WHERE user_id = ?1 ORDER BY start_date DESC, id DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(self.pool())
        .await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in &rows {
            let plan = row_to_meal_plan(row)?;
            details.push(self.assemble_plan_detail(plan).await?);
        }
        Ok(details)
    }

    /// Fetch the nested representation of one meal plan
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_meal_plan_detail(&self, id: i64) -> Result<Option<MealPlanDetail>, AppError> {
        let Some(plan) = self.get_meal_plan(id).await? else {
            return Ok(None);
        };

        Ok(Some(self.assemble_plan_detail(plan).await?))
    }

    /// Overwrite a meal plan's fields; returns false when the id does not exist
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn update_meal_plan(
        &self,
        id: i64,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r"
            UPDATE meal_plans SET name = ?1, start_date = ?2, end_date = ?3 WHERE id = ?4
            ",
        )
        .bind(name)
        .bind(start_date)
        .bind(end_date)
        .bind(id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a meal plan; memberships and shopping list items cascade
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn delete_meal_plan(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace a plan's recipe membership set
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn set_meal_plan_recipes(
        &self,
        plan_id: i64,
        recipe_ids: &[i64],
    ) -> Result<(), AppError> {
        let mut tx = self.begin().await?;

        sqlx::query("DELETE FROM meal_plan_recipes WHERE meal_plan_id = ?1")
            .bind(plan_id)
            .execute(&mut *tx)
            .await?;

        for recipe_id in recipe_ids {
            sqlx::query(
                r"
                INSERT INTO meal_plan_recipes (meal_plan_id, recipe_id)
                VALUES (?1, ?2)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(plan_id)
            .bind(recipe_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Recipe ids belonging to a plan
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn meal_plan_recipe_ids(&self, plan_id: i64) -> Result<Vec<i64>, AppError> {
        let rows = sqlx::query(
            "SELECT recipe_id FROM meal_plan_recipes WHERE meal_plan_id = ?1 ORDER BY recipe_id",
        )
        .bind(plan_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(|row| row.get("recipe_id")).collect())
    }

    async fn assemble_plan_detail(&self, plan: MealPlan) -> Result<MealPlanDetail, AppError> {
        let owner = sqlx::query("SELECT username FROM users WHERE id = ?1")
            .bind(plan.user_id.to_string())
            .fetch_one(self.pool())
            .await?;

        let mut recipes = Vec::new();
        for recipe_id in self.meal_plan_recipe_ids(plan.id).await? {
            if let Some(detail) = self.get_recipe_detail(recipe_id).await? {
                recipes.push(detail);
            }
        }

        Ok(MealPlanDetail {
            id: plan.id,
            user: UserRef {
                id: plan.user_id,
                username: owner.get("username"),
            },
            name: plan.name,
            start_date: plan.start_date,
            end_date: plan.end_date,
            recipes,
        })
    }
}
