// ABOUTME: Offline bulk importer binary loading recipe CSV datasets for one user
// ABOUTME: Runs the whole file as a single all-or-nothing transaction
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Recipe dataset loader
//!
//! Loads recipes from a CSV file into the database, attached to an existing
//! user. Either every row is committed or, on the first failure, none are.
//!
//! Usage:
//! ```bash
//! # Load a dataset for the given user
//! cargo run --bin load-recipes -- recipes.csv --user admin
//!
//! # Override the database location
//! cargo run --bin load-recipes -- recipes.csv --user admin \
//!     --database-url sqlite:data/recipe_planner.db
//! ```

use anyhow::Result;
use clap::Parser;
use recipe_planner::{database::Database, import::BulkImporter, logging};
use std::path::PathBuf;
use tracing::{error, info};

/// Default SQLite database URL, matching the server's default
const DEFAULT_DATABASE_URL: &str = "sqlite:data/recipe_planner.db";

#[derive(Parser)]
#[command(name = "load-recipes")]
#[command(about = "Load recipes from a CSV file into the database")]
struct Args {
    /// Path to the CSV file containing recipe data
    csv_file: PathBuf,

    /// Username to associate with the loaded recipes
    #[arg(long, default_value = "admin")]
    user: String,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let database_url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

    let database = Database::new(&database_url).await?;
    database.migrate().await?;

    let importer = BulkImporter::new(&database);
    match importer.run(&args.csv_file, &args.user).await {
        Ok(summary) => {
            info!(
                recipes = summary.recipes_created,
                user = %args.user,
                "Import finished"
            );
            Ok(())
        }
        Err(e) => {
            error!("Import failed, nothing was committed: {e:#}");
            Err(e)
        }
    }
}
