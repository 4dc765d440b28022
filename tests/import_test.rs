// ABOUTME: Integration tests for the bulk CSV recipe importer
// ABOUTME: Covers field parsing, reference data dedup, and all-or-nothing atomicity
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

mod common;

use common::{create_test_database, create_test_user};
use recipe_planner::import::BulkImporter;
use std::path::PathBuf;
use tempfile::TempDir;

const HEADER: &str = "recipe_name,directions,total_time,cook_time,prep_time,cuisine_path,nutrition,ingredients";

fn write_csv(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("recipes.csv");
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    std::fs::write(&path, content).expect("write csv");
    path
}

#[tokio::test]
async fn test_import_creates_recipe_with_parsed_fields() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "admin").await;
    let dir = TempDir::new().unwrap();

    let path = write_csv(
        &dir,
        &[r#"Pasta,Boil pasta. Serve.,30 min,,,world/italian-cuisine,"vegan, gluten-free","2 cups flour, salt, 1/2 cup sugar""#],
    );

    let summary = BulkImporter::new(&database)
        .run(&path, "admin")
        .await
        .expect("import succeeds");
    assert_eq!(summary.recipes_created, 1);

    let recipes = database.list_recipes_for_user(user.id).await.unwrap();
    assert_eq!(recipes.len(), 1);

    let recipe = &recipes[0];
    assert_eq!(recipe.title, "Pasta");
    assert_eq!(recipe.instructions, "Boil pasta. Serve.");
    assert_eq!(recipe.cooking_time_minutes, Some(30));
    assert_eq!(recipe.cuisine.as_deref(), Some("Italian Cuisine"));
    assert!(!recipe.generated_by_ai);

    assert_eq!(
        recipe.dietary_preferences,
        vec!["Vegan".to_owned(), "Gluten-free".to_owned()]
    );

    let lines: Vec<(&str, &str)> = recipe
        .ingredients
        .iter()
        .map(|l| (l.ingredient_name.as_str(), l.quantity.as_str()))
        .collect();
    assert_eq!(
        lines,
        vec![("cups flour", "2"), ("salt", "some"), ("cup sugar", "1/2")]
    );
}

#[tokio::test]
async fn test_import_applies_fallbacks_for_missing_fields() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "admin").await;
    let dir = TempDir::new().unwrap();

    let path = write_csv(&dir, &[",,,,,,,"]);

    BulkImporter::new(&database)
        .run(&path, "admin")
        .await
        .expect("import succeeds");

    let recipes = database.list_recipes_for_user(user.id).await.unwrap();
    assert_eq!(recipes[0].title, "Untitled Recipe 1");
    assert_eq!(recipes[0].instructions, "No instructions provided.");
    assert_eq!(recipes[0].cooking_time_minutes, None);
    assert_eq!(recipes[0].cuisine, None);
    assert!(recipes[0].ingredients.is_empty());
}

#[tokio::test]
async fn test_duration_falls_back_through_time_columns() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "admin").await;
    let dir = TempDir::new().unwrap();

    // total_time empty, cook_time present
    let path = write_csv(&dir, &["Stew,Cook slowly.,,2 hour,15 min,,,beef"]);

    BulkImporter::new(&database)
        .run(&path, "admin")
        .await
        .unwrap();

    let recipes = database.list_recipes_for_user(user.id).await.unwrap();
    assert_eq!(recipes[0].cooking_time_minutes, Some(120));
}

#[tokio::test]
async fn test_shared_ingredient_created_once_across_records() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "admin").await;
    let dir = TempDir::new().unwrap();

    let path = write_csv(
        &dir,
        &[
            "Omelette,Whisk and fry.,,,,,,1 egg",
            "Fried Rice,Fry rice.,,,,,,\"1 egg, rice\"",
        ],
    );

    BulkImporter::new(&database)
        .run(&path, "admin")
        .await
        .unwrap();

    let ingredients = database.list_ingredients().await.unwrap();
    let eggs: Vec<_> = ingredients.iter().filter(|i| i.name == "egg").collect();
    assert_eq!(eggs.len(), 1, "exactly one shared ingredient row named egg");

    let recipes = database.list_recipes_for_user(user.id).await.unwrap();
    let egg_lines = recipes
        .iter()
        .flat_map(|r| &r.ingredients)
        .filter(|l| l.ingredient_name == "egg")
        .count();
    assert_eq!(egg_lines, 2, "one line per recipe referencing the shared row");
}

#[tokio::test]
async fn test_duplicate_ingredient_within_record_keeps_first() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "admin").await;
    let dir = TempDir::new().unwrap();

    let path = write_csv(&dir, &["Bread,Bake.,,,,,,\"2 cups flour, 3 cups Flour\""]);

    BulkImporter::new(&database)
        .run(&path, "admin")
        .await
        .unwrap();

    let recipes = database.list_recipes_for_user(user.id).await.unwrap();
    assert_eq!(recipes[0].ingredients.len(), 1);
    assert_eq!(recipes[0].ingredients[0].quantity, "2");
    assert_eq!(recipes[0].ingredients[0].ingredient_name, "cups flour");
}

#[tokio::test]
async fn test_import_is_atomic_when_a_record_fails() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "admin").await;
    let dir = TempDir::new().unwrap();

    // Ten rows; row 5 has a trailing extra field, which the CSV reader
    // rejects mid-iteration.
    let mut rows: Vec<String> = (1..=10)
        .map(|i| format!("Recipe {i},Cook.,,,,,,\"{i} cups water, salt\""))
        .collect();
    rows[4].push_str(",unexpected-extra-field");
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let path = write_csv(&dir, &rows);

    let result = BulkImporter::new(&database).run(&path, "admin").await;
    assert!(result.is_err(), "import must fail on the malformed row");

    let recipes = database.list_recipes_for_user(user.id).await.unwrap();
    assert!(recipes.is_empty(), "no recipe from the invocation survives");

    let ingredients = database.list_ingredients().await.unwrap();
    assert!(
        ingredients.is_empty(),
        "reference rows created before the failure roll back too"
    );
}

#[tokio::test]
async fn test_import_fails_fast_for_missing_user() {
    let database = create_test_database().await;
    create_test_user(&database, "admin").await;
    let dir = TempDir::new().unwrap();

    let path = write_csv(&dir, &["Soup,Simmer.,,,,,,water"]);

    let err = BulkImporter::new(&database)
        .run(&path, "ghost")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[tokio::test]
async fn test_import_fails_fast_for_missing_file() {
    let database = create_test_database().await;
    create_test_user(&database, "admin").await;

    let err = BulkImporter::new(&database)
        .run(std::path::Path::new("/nonexistent/recipes.csv"), "admin")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to open CSV file"));
}
