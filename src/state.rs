// ABOUTME: Shared server state threaded into every route handler
// ABOUTME: Bundles the database, auth manager, and optional LLM backend
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::auth::AuthManager;
use crate::database::Database;
use crate::llm::LlmProvider;
use std::sync::Arc;

/// Shared resources for the HTTP server
///
/// The LLM backend is optional: when the Gemini credential is not configured
/// the server still serves every CRUD endpoint and only generation requests
/// fail, with a configuration error.
pub struct ServerState {
    /// SQLite storage
    pub database: Database,
    /// JWT authentication manager
    pub auth: AuthManager,
    /// Generation backend, present when a credential is configured
    pub llm: Option<Arc<dyn LlmProvider>>,
}

impl ServerState {
    /// Bundle server resources
    #[must_use]
    pub fn new(database: Database, auth: AuthManager, llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            database,
            auth,
            llm,
        }
    }
}
