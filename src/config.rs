// ABOUTME: Environment-based server configuration for deployment-specific settings
// ABOUTME: Reads database, auth, and generation-service settings from process environment
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Environment-based configuration management
//!
//! All runtime settings come from the process environment; nothing is read
//! from files. The Gemini credential is captured here once and threaded into
//! the generation service at construction so request handlers never touch the
//! environment themselves.

use anyhow::{Context, Result};
use std::env;

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default SQLite database URL when `DATABASE_URL` is unset
const DEFAULT_DATABASE_URL: &str = "sqlite:data/recipe_planner.db";

/// Default JWT expiry in hours when `JWT_EXPIRY_HOURS` is unset
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP API
    pub http_port: u16,
    /// SQLite connection URL
    pub database_url: String,
    /// Secret used to sign JWT tokens
    pub jwt_secret: String,
    /// JWT lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Gemini API key; generation requests fail with a configuration error
    /// when absent
    pub gemini_api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or a numeric variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("HTTP_PORT") {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid HTTP_PORT value: {port}"))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        let jwt_secret =
            env::var("JWT_SECRET").context("JWT_SECRET environment variable not set")?;

        let jwt_expiry_hours = match env::var("JWT_EXPIRY_HOURS") {
            Ok(hours) => hours
                .parse::<i64>()
                .with_context(|| format!("Invalid JWT_EXPIRY_HOURS value: {hours}"))?,
            Err(_) => DEFAULT_JWT_EXPIRY_HOURS,
        };

        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());

        Ok(Self {
            http_port,
            database_url,
            jwt_secret,
            jwt_expiry_hours,
            gemini_api_key,
        })
    }

    /// Human-readable startup summary, with secrets elided
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} database_url={} jwt_expiry_hours={} gemini_api_key={}",
            self.http_port,
            self.database_url,
            self.jwt_expiry_hours,
            if self.gemini_api_key.is_some() {
                "configured"
            } else {
                "not configured"
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "HTTP_PORT",
            "DATABASE_URL",
            "JWT_SECRET",
            "JWT_EXPIRY_HOURS",
            "GEMINI_API_KEY",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_applied() {
        clear_env();
        env::set_var("JWT_SECRET", "test-secret");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.jwt_expiry_hours, DEFAULT_JWT_EXPIRY_HOURS);
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_missing_jwt_secret_is_an_error() {
        clear_env();
        assert!(ServerConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_summary_elides_secrets() {
        clear_env();
        env::set_var("JWT_SECRET", "test-secret");
        env::set_var("GEMINI_API_KEY", "very-secret-key");

        let config = ServerConfig::from_env().unwrap();
        let summary = config.summary();
        assert!(!summary.contains("very-secret-key"));
        assert!(summary.contains("gemini_api_key=configured"));
        clear_env();
    }
}
