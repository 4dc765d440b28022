// ABOUTME: Main library entry point for the Recipe Planner API server
// ABOUTME: Provides recipe, meal plan, and shopping list management with AI recipe generation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Recipe Planner Server
//!
//! A multi-user REST API for recipe management: recipes, shared ingredient and
//! dietary-preference reference data, meal plans, and shopping lists. Recipes
//! can be created by hand, bulk-loaded from CSV with the `load-recipes` binary,
//! or generated through Google's Gemini API and persisted with their ingredient
//! associations.
//!
//! ## Features
//!
//! - **JWT authentication**: register/login with per-user resource scoping
//! - **Shared reference data**: ingredients and dietary preferences are
//!   deduplicated globally by name with get-or-create semantics
//! - **Bulk import**: all-or-nothing CSV ingestion of recipe datasets
//! - **AI generation**: schema-constrained Gemini responses mapped onto the
//!   domain model as one atomic batch

/// JWT authentication and password hashing
pub mod auth;
/// Environment-based server configuration
pub mod config;
/// SQLite storage layer
pub mod database;
/// Unified error handling
pub mod errors;
/// AI recipe generation service
pub mod generation;
/// Bulk CSV recipe import
pub mod import;
/// LLM provider client
pub mod llm;
/// Logging configuration
pub mod logging;
/// Domain models
pub mod models;
/// HTTP route handlers
pub mod routes;
/// Shared server state
pub mod state;
