// ABOUTME: Integration tests for the AI recipe mapper and its batch semantics
// ABOUTME: Uses stub LLM backends; covers persistence, validation aborts, and error mapping
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

mod common;

use common::{create_test_database, create_test_user, StaticLlm, UnreachableLlm};
use recipe_planner::errors::ErrorCode;
use recipe_planner::generation::{GenerateRecipesRequest, RecipeGenerator};
use std::sync::Arc;

fn request_with_preferences(preferences: &str) -> GenerateRecipesRequest {
    GenerateRecipesRequest {
        ingredients: "chicken".to_owned(),
        dietary_preferences: preferences.to_owned(),
        cooking_time: "30".to_owned(),
        cuisine: "Thai".to_owned(),
        num_recipes: 2,
    }
}

const TWO_RECIPES: &str = r#"[
    {
        "title": "Green Curry",
        "instructions": "Fry paste. Add coconut milk and chicken.",
        "cooking_time_minutes": 30,
        "cuisine": "Thai",
        "ingredients": [
            {"name": "Chicken Breast", "quantity": "500g"},
            {"name": "coconut milk", "quantity": "1 can"}
        ]
    },
    {
        "title": "Pad Krapow",
        "instructions": "Stir-fry chicken with basil.",
        "cooking_time_minutes": 20,
        "cuisine": "Thai",
        "ingredients": [
            {"name": "chicken breast", "quantity": "400g"},
            {"name": "holy basil", "quantity": "1 bunch"}
        ]
    }
]"#;

#[tokio::test]
async fn test_generated_batch_is_persisted_with_ai_flag() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "alice").await;

    let generator = RecipeGenerator::new(database.clone(), Arc::new(StaticLlm::new(TWO_RECIPES)));
    let recipes = generator
        .generate(&user, &request_with_preferences("vegan, gluten-free"))
        .await
        .expect("generation succeeds");

    assert_eq!(recipes.len(), 2);
    for recipe in &recipes {
        assert!(recipe.generated_by_ai);
        assert_eq!(recipe.user.username, "alice");
        // Every recipe of one request gets the caller's preference set
        assert_eq!(
            recipe.dietary_preferences,
            vec!["Vegan".to_owned(), "Gluten-free".to_owned()]
        );
    }

    assert_eq!(recipes[0].title, "Green Curry");
    assert_eq!(recipes[1].title, "Pad Krapow");
}

#[tokio::test]
async fn test_generated_ingredients_are_lowercased_and_shared() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "alice").await;

    let generator = RecipeGenerator::new(database.clone(), Arc::new(StaticLlm::new(TWO_RECIPES)));
    let recipes = generator
        .generate(&user, &request_with_preferences(""))
        .await
        .unwrap();

    assert_eq!(recipes[0].ingredients[0].ingredient_name, "chicken breast");
    assert_eq!(recipes[0].ingredients[0].quantity, "500g");

    // "Chicken Breast" and "chicken breast" resolve to one shared row
    let ingredients = database.list_ingredients().await.unwrap();
    let chicken: Vec<_> = ingredients
        .iter()
        .filter(|i| i.name == "chicken breast")
        .collect();
    assert_eq!(chicken.len(), 1);
    assert_eq!(
        recipes[0].ingredients[0].ingredient_id,
        recipes[1].ingredients[0].ingredient_id
    );
}

#[tokio::test]
async fn test_invalid_second_recipe_aborts_whole_batch() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "alice").await;

    let body = r#"[
        {"title": "Fine", "instructions": "Cook.", "cooking_time_minutes": 10,
         "cuisine": "Thai", "ingredients": [{"name": "rice", "quantity": "1 cup"}]},
        {"title": "", "instructions": "Cook.", "cooking_time_minutes": 10,
         "cuisine": "Thai", "ingredients": []},
        {"title": "Also Fine", "instructions": "Cook.", "cooking_time_minutes": 10,
         "cuisine": "Thai", "ingredients": []}
    ]"#;

    let generator = RecipeGenerator::new(database.clone(), Arc::new(StaticLlm::new(body)));
    let err = generator
        .generate(&user, &request_with_preferences("vegan"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert_eq!(err.details["recipe_index"], 1);
    assert!(!err.details["errors"]["title"].is_null());

    // Nothing from the batch persists, including the valid first recipe
    let recipes = database.list_recipes_for_user(user.id).await.unwrap();
    assert!(recipes.is_empty());
    let ingredients = database.list_ingredients().await.unwrap();
    assert!(ingredients.is_empty(), "resolved ingredients roll back too");
}

#[tokio::test]
async fn test_unparseable_generated_text_is_a_service_error() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "alice").await;

    let generator =
        RecipeGenerator::new(database.clone(), Arc::new(StaticLlm::new("this is not json")));
    let err = generator
        .generate(&user, &request_with_preferences(""))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_transport_failure_is_service_unavailable() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "alice").await;

    let generator = RecipeGenerator::new(database.clone(), Arc::new(UnreachableLlm));
    let err = generator
        .generate(&user, &request_with_preferences(""))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);

    let recipes = database.list_recipes_for_user(user.id).await.unwrap();
    assert!(recipes.is_empty());
}

#[tokio::test]
async fn test_missing_optional_fields_default_sanely() {
    let database = create_test_database().await;
    let user = create_test_user(&database, "alice").await;

    // cooking_time_minutes and cuisine are optional in the domain
    let body = r#"[
        {"title": "Mystery Stew", "instructions": "Simmer everything.",
         "ingredients": [{"name": "carrot", "quantity": "2"}]}
    ]"#;

    let generator = RecipeGenerator::new(database.clone(), Arc::new(StaticLlm::new(body)));
    let recipes = generator
        .generate(&user, &request_with_preferences(""))
        .await
        .unwrap();

    assert_eq!(recipes[0].cooking_time_minutes, None);
    assert_eq!(recipes[0].cuisine, None);
    assert!(recipes[0].dietary_preferences.is_empty());
}
