// ABOUTME: User storage queries for account creation and lookup
// ABOUTME: Maps between the users table and the User domain model
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::Database;
use crate::errors::AppError;
use crate::models::User;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

fn row_to_user(row: &SqliteRow) -> Result<User, AppError> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(User {
        id: Uuid::parse_str(&id)
            .map_err(|e| AppError::database(format!("Corrupt user id {id}: {e}")))?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| AppError::database(format!("Corrupt created_at: {e}")))?
            .with_timezone(&Utc),
        is_active: row.try_get("is_active")?,
    })
}

impl Database {
    /// Insert a new user row
    ///
    /// # Errors
    ///
    /// Returns a conflict error when the username is taken.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, password_hash, created_at, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .bind(user.is_active)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Look up a user by id
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Look up a user by username
    ///
    /// # Errors
    ///
    /// Returns a database error on query failure.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }
}
