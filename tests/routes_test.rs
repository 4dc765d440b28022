// ABOUTME: Integration tests for HTTP routes, auth, and ownership scoping
// ABOUTME: Drives the composed axum router with oneshot requests
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::{create_test_database, create_test_state, create_test_user, StaticLlm};
use recipe_planner::database::insert_recipe;
use recipe_planner::models::{NewRecipe, User};
use recipe_planner::routes;
use recipe_planner::state::ServerState;
use std::sync::Arc;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn setup() -> (Router, Arc<ServerState>, User, String, User, String) {
    let database = create_test_database().await;
    let alice = create_test_user(&database, "alice").await;
    let bob = create_test_user(&database, "bob").await;

    let state = create_test_state(database, None);
    let alice_token = state.auth.generate_token(&alice).unwrap();
    let bob_token = state.auth.generate_token(&bob).unwrap();
    let app = routes::router(state.clone());

    (app, state, alice, alice_token, bob, bob_token)
}

async fn create_recipe_for(state: &ServerState, user: &User, title: &str) -> i64 {
    let mut conn = state.database.pool().acquire().await.unwrap();
    let recipe = NewRecipe {
        title: title.to_owned(),
        instructions: "Cook.".to_owned(),
        cooking_time_minutes: Some(5),
        cuisine: None,
        generated_by_ai: false,
    };
    insert_recipe(&mut conn, user.id, &recipe).await.unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, ..) = setup().await;

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_scoped_endpoints_require_authentication() {
    let (app, ..) = setup().await;

    for uri in [
        "/api/recipes",
        "/api/meal-plans",
        "/api/shopping-list-items",
    ] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    // Shared reference data stays reachable without a token
    let response = app.oneshot(get("/api/ingredients", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let (app, ..) = setup().await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/register",
            None,
            serde_json::json!({"username": "carol", "password": "correct horse"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({"username": "carol", "password": "correct horse"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_owned();
    assert_eq!(body["user"]["username"], "carol");

    let response = app
        .oneshot(get("/api/recipes", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (app, ..) = setup().await;

    app.clone()
        .oneshot(send_json(
            "POST",
            "/api/auth/register",
            None,
            serde_json::json!({"username": "carol", "password": "correct horse"}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({"username": "carol", "password": "wrong horse"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_recipe_crud_round_trip() {
    let (app, _state, _alice, alice_token, ..) = setup().await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/recipes",
            Some(&alice_token),
            serde_json::json!({
                "title": "Pancakes",
                "instructions": "Mix and fry.",
                "cooking_time_minutes": 15
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["user"]["username"], "alice");
    assert_eq!(created["generated_by_ai"], false);

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/recipes/{id}"),
            Some(&alice_token),
            serde_json::json!({"cuisine": "American"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["cuisine"], "American");
    assert_eq!(updated["title"], "Pancakes");

    let response = app
        .clone()
        .oneshot(get("/api/recipes", Some(&alice_token)))
        .await
        .unwrap();
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/recipes/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {alice_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get(&format!("/api/recipes/{id}"), Some(&alice_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_recipe_body_reports_fields() {
    let (app, _state, _alice, alice_token, ..) = setup().await;

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/recipes",
            Some(&alice_token),
            serde_json::json!({"title": "", "instructions": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert!(!body["error"]["details"]["title"].is_null());
}

#[tokio::test]
async fn test_foreign_recipe_access_is_forbidden_not_hidden() {
    let (app, state, alice, _alice_token, _bob, bob_token) = setup().await;

    let id = create_recipe_for(&state, &alice, "Alice's Secret Sauce").await;

    let response = app
        .clone()
        .oneshot(get(&format!("/api/recipes/{id}"), Some(&bob_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "PERMISSION_DENIED");

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/api/recipes/{id}"),
            Some(&bob_token),
            serde_json::json!({"title": "Stolen"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/recipes/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {bob_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Bob's own listing stays empty
    let response = app
        .oneshot(get("/api/recipes", Some(&bob_token)))
        .await
        .unwrap();
    let list = body_json(response).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_meal_plan_scoping_and_shopping_item_creation() {
    let (app, _state, _alice, alice_token, _bob, bob_token) = setup().await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/meal-plans",
            Some(&alice_token),
            serde_json::json!({
                "name": "Week 23",
                "start_date": "2025-06-02",
                "end_date": "2025-06-08"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let plan = body_json(response).await;
    let plan_id = plan["id"].as_i64().unwrap();

    // Bob can neither read the plan...
    let response = app
        .clone()
        .oneshot(get(&format!("/api/meal-plans/{plan_id}"), Some(&bob_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // ...nor attach shopping list items to it
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/ingredients",
            Some(&bob_token),
            serde_json::json!({"name": "milk"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let ingredient = body_json(response).await;
    let ingredient_id = ingredient["id"].as_i64().unwrap();

    let item_body = serde_json::json!({
        "meal_plan_id": plan_id,
        "ingredient_id": ingredient_id,
        "quantity": "1l"
    });

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/shopping-list-items",
            Some(&bob_token),
            item_body.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner can
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/api/shopping-list-items",
            Some(&alice_token),
            item_body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let item = body_json(response).await;
    assert_eq!(item["ingredient_name"], "milk");
    assert_eq!(item["is_checked"], false);
}

#[tokio::test]
async fn test_meal_plan_rejects_foreign_recipes() {
    let (app, state, alice, _alice_token, _bob, bob_token) = setup().await;

    let recipe_id = create_recipe_for(&state, &alice, "Alice's Roast").await;

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/meal-plans",
            Some(&bob_token),
            serde_json::json!({
                "start_date": "2025-06-02",
                "end_date": "2025-06-08",
                "recipe_ids": [recipe_id]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_generate_without_credential_is_a_config_error() {
    let (app, _state, _alice, alice_token, ..) = setup().await;

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/generate-recipe",
            Some(&alice_token),
            serde_json::json!({"ingredients": "chicken", "num_recipes": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CONFIG_ERROR");
}

#[tokio::test]
async fn test_generate_endpoint_returns_created_batch() {
    let database = create_test_database().await;
    let alice = create_test_user(&database, "alice").await;

    let generated = r#"[
        {"title": "Lemon Chicken", "instructions": "Roast with lemon.",
         "cooking_time_minutes": 45, "cuisine": "Greek",
         "ingredients": [{"name": "Chicken", "quantity": "1 whole"}]}
    ]"#;
    let state = create_test_state(database, Some(Arc::new(StaticLlm::new(generated))));
    let token = state.auth.generate_token(&alice).unwrap();
    let app = routes::router(state);

    let response = app
        .oneshot(send_json(
            "POST",
            "/api/generate-recipe",
            Some(&token),
            serde_json::json!({
                "ingredients": "chicken, lemon",
                "dietary_preferences": "gluten-free",
                "num_recipes": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    let recipes = body.as_array().unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["title"], "Lemon Chicken");
    assert_eq!(recipes[0]["generated_by_ai"], true);
    assert_eq!(recipes[0]["dietary_preferences"][0], "Gluten-free");
    assert_eq!(recipes[0]["ingredients"][0]["ingredient_name"], "chicken");
}
