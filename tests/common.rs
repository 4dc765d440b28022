// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, auth, user creation, and stub LLM helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(dead_code)]

//! Shared test utilities for `recipe_planner` integration tests

use async_trait::async_trait;
use recipe_planner::{
    auth::AuthManager,
    database::Database,
    errors::AppError,
    llm::LlmProvider,
    models::User,
    state::ServerState,
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup: in-memory SQLite with the schema applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    let database = Database::new("sqlite::memory:")
        .await
        .expect("in-memory database");
    database.migrate().await.expect("schema migration");
    database
}

/// Create a test user with a throwaway password hash
pub async fn create_test_user(database: &Database, username: &str) -> User {
    let user = User::new(username, "not-a-real-hash");
    database.create_user(&user).await.expect("create user");
    user
}

/// Create a test authentication manager with a fixed secret
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(b"test-jwt-secret".to_vec(), 24)
}

/// An LLM backend that returns a canned response body
pub struct StaticLlm {
    body: String,
}

impl StaticLlm {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait]
impl LlmProvider for StaticLlm {
    async fn generate_json(
        &self,
        _prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<String, AppError> {
        Ok(self.body.clone())
    }
}

/// An LLM backend that always fails with a transport error
pub struct UnreachableLlm;

#[async_trait]
impl LlmProvider for UnreachableLlm {
    async fn generate_json(
        &self,
        _prompt: &str,
        _schema: &serde_json::Value,
    ) -> Result<String, AppError> {
        Err(AppError::external_unavailable("Gemini", "connection refused"))
    }
}

/// Build server state around a database with an optional stub LLM backend
pub fn create_test_state(
    database: Database,
    llm: Option<Arc<dyn LlmProvider>>,
) -> Arc<ServerState> {
    Arc::new(ServerState::new(database, create_test_auth_manager(), llm))
}
