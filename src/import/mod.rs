// ABOUTME: Bulk CSV recipe importer with all-or-nothing transaction semantics
// ABOUTME: Maps loosely structured dataset rows onto recipes, ingredients, and preferences
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Bulk Recipe Import
//!
//! Reads a recipe dataset CSV and creates one recipe per row for a target
//! user, together with its ingredient lines and dietary-preference links.
//! The whole invocation runs inside a single transaction: any failure rolls
//! back every row already processed.
//!
//! Expected columns (all optional except that empty rows produce fallback
//! values): `recipe_name`, `directions`, `total_time`, `cook_time`,
//! `prep_time`, `cuisine_path`, `nutrition` (comma-separated preference
//! list), `ingredients` (comma-separated ingredient list).

pub mod parse;

use crate::database::{
    add_ingredient_line, get_or_create_ingredient, get_or_create_preference, insert_recipe,
    link_preference, Database,
};
use crate::models::NewRecipe;
use anyhow::{bail, Context, Result};
use csv::StringRecord;
use parse::{derive_cuisine, normalize_duration, parse_ingredient_line};
use sqlx::SqliteConnection;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Placeholder instructions for rows without directions
const FALLBACK_INSTRUCTIONS: &str = "No instructions provided.";

/// Result summary of a completed import
#[derive(Debug, Clone, Copy)]
pub struct ImportSummary {
    /// Number of recipes created
    pub recipes_created: usize,
}

/// Column indices resolved from the CSV header row
struct Columns {
    recipe_name: Option<usize>,
    directions: Option<usize>,
    total_time: Option<usize>,
    cook_time: Option<usize>,
    prep_time: Option<usize>,
    cuisine_path: Option<usize>,
    nutrition: Option<usize>,
    ingredients: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            recipe_name: find("recipe_name"),
            directions: find("directions"),
            total_time: find("total_time"),
            cook_time: find("cook_time"),
            prep_time: find("prep_time"),
            cuisine_path: find("cuisine_path"),
            nutrition: find("nutrition"),
            ingredients: find("ingredients"),
        }
    }
}

fn field<'r>(record: &'r StringRecord, index: Option<usize>) -> Option<&'r str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Bulk recipe importer bound to a database
pub struct BulkImporter<'a> {
    database: &'a Database,
}

impl<'a> BulkImporter<'a> {
    /// Create an importer over the given database
    #[must_use]
    pub fn new(database: &'a Database) -> Self {
        Self { database }
    }

    /// Import every row of the CSV for the named user, atomically
    ///
    /// # Errors
    ///
    /// Fails fast when the user does not exist or the file is unreadable.
    /// Any failure while processing a record rolls back the entire import
    /// and reports the offending row.
    pub async fn run(&self, csv_path: &Path, username: &str) -> Result<ImportSummary> {
        let Some(user) = self.database.get_user_by_username(username).await? else {
            bail!("User \"{username}\" does not exist. Please create it first or specify an existing user.");
        };

        let file = std::fs::File::open(csv_path)
            .with_context(|| format!("Failed to open CSV file at {}", csv_path.display()))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .context("Failed to read CSV header row")?
            .clone();
        let columns = Columns::resolve(&headers);

        info!(
            path = %csv_path.display(),
            user = %user.username,
            "Starting recipe import"
        );

        let mut tx = self.database.begin().await?;
        let mut recipes_created = 0usize;

        for (index, result) in reader.records().enumerate() {
            let row_num = index + 1;
            let record =
                result.with_context(|| format!("Failed to read CSV record at row {row_num}"))?;

            import_record(&mut tx, user.id, row_num, &record, &columns)
                .await
                .with_context(|| format!("Failed to import record at row {row_num}"))?;
            recipes_created += 1;
        }

        tx.commit().await.context("Failed to commit import")?;

        info!(recipes_created, "Successfully loaded recipes");
        Ok(ImportSummary { recipes_created })
    }
}

async fn import_record(
    conn: &mut SqliteConnection,
    user_id: Uuid,
    row_num: usize,
    record: &StringRecord,
    columns: &Columns,
) -> Result<()> {
    let title = field(record, columns.recipe_name)
        .map_or_else(|| format!("Untitled Recipe {row_num}"), str::to_owned);

    info!(row = row_num, title = %title, "Processing row");

    let instructions = field(record, columns.directions)
        .map_or_else(|| FALLBACK_INSTRUCTIONS.to_owned(), str::to_owned);

    let cooking_time_minutes = normalize_duration(&[
        field(record, columns.total_time),
        field(record, columns.cook_time),
        field(record, columns.prep_time),
    ]);

    let cuisine = field(record, columns.cuisine_path).and_then(derive_cuisine);

    let recipe = NewRecipe {
        title,
        instructions,
        cooking_time_minutes,
        cuisine,
        generated_by_ai: false,
    };

    let recipe_id = insert_recipe(&mut *conn, user_id, &recipe).await?;

    if let Some(ingredients) = field(record, columns.ingredients) {
        let mut processed: HashSet<String> = HashSet::new();

        for entry in ingredients.split(',') {
            let Some(parsed) = parse_ingredient_line(entry) else {
                continue;
            };
            let normalized = parsed.name.to_lowercase();
            // First occurrence wins within a recipe
            if !processed.insert(normalized.clone()) {
                continue;
            }

            let ingredient = get_or_create_ingredient(&mut *conn, &normalized).await?;
            add_ingredient_line(&mut *conn, recipe_id, ingredient.id, &parsed.quantity).await?;
        }
    }

    if let Some(preferences) = field(record, columns.nutrition) {
        for name in preferences.split(',') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let preference = get_or_create_preference(&mut *conn, name).await?;
            link_preference(&mut *conn, recipe_id, preference.id).await?;
        }
    }

    Ok(())
}
