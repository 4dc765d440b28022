// ABOUTME: Registration and login route handlers issuing JWT tokens
// ABOUTME: Validates credentials against bcrypt hashes stored with the user
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Authentication routes
//!
//! `POST /api/auth/register` creates an account; `POST /api/auth/login`
//! verifies credentials and returns a bearer token for the scoped endpoints.

use crate::auth::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::{User, UserRef};
use crate::state::ServerState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

/// Registration request payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Registration response with the created user
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserRef,
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with the bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserRef,
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    #[must_use]
    pub fn routes(state: Arc<ServerState>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .with_state(state)
    }

    /// Handle POST /api/auth/register
    async fn handle_register(
        State(state): State<Arc<ServerState>>,
        Json(body): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let username = body.username.trim();
        if username.is_empty() {
            return Err(AppError::invalid_input("Username may not be blank"));
        }
        if body.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = hash_password(body.password).await?;
        let user = User::new(username, password_hash);
        state.database.create_user(&user).await?;

        info!(username = %user.username, "Registered new user");

        let response = RegisterResponse {
            user: user.to_ref(),
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle POST /api/auth/login
    async fn handle_login(
        State(state): State<Arc<ServerState>>,
        Json(body): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        // A missing user and a wrong password answer identically
        let invalid = || AppError::auth_invalid("Invalid username or password");

        let user = state
            .database
            .get_user_by_username(body.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !user.is_active {
            return Err(invalid());
        }

        if !verify_password(body.password, user.password_hash.clone()).await? {
            return Err(invalid());
        }

        let token = state.auth.generate_token(&user)?;

        let response = LoginResponse {
            token,
            user: user.to_ref(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
