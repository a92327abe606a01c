use axum::http::StatusCode;
use serde_json::Value;

use foodgram_domain::user::UserRole;

use crate::helpers::{
    TestApp, as_user, create_recipe, recipe_body, seed_ingredient, seed_tag, seed_user,
    spawn_app,
};

async fn app_with_recipe() -> (TestApp, foodgram_testing::auth::MockAuth, i64) {
    let app = spawn_app().await;
    let author = seed_user(&app.db, "anna", UserRole::Normal).await;
    let tag = seed_tag(&app.db, "Breakfast", "breakfast").await;
    let flour = seed_ingredient(&app.db, "flour", "g").await;
    let recipe = create_recipe(&app, author, &recipe_body("Pancakes", &[tag], &[(flour, 200)])).await;
    (app, author, recipe)
}

// ── Favorites ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_favorite_once_then_reject_duplicate() {
    let (app, _, recipe) = app_with_recipe().await;
    let viewer = seed_user(&app.db, "boris", UserRole::Normal).await;
    let path = format!("/recipes/{recipe}/favorite/");

    let first = as_user(app.server.post(&path), viewer).await;
    first.assert_status(StatusCode::CREATED);
    let body = first.json::<Value>();
    assert_eq!(body["id"], recipe);
    assert_eq!(body["name"], "Pancakes");
    assert_eq!(body["cooking_time"], 30);

    let second = as_user(app.server.post(&path), viewer).await;
    second.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(second.json::<Value>()["kind"], "ALREADY_EXISTS");
}

#[tokio::test]
async fn should_return_not_found_for_missing_recipe() {
    let (app, author, _) = app_with_recipe().await;

    let response = as_user(app.server.post("/recipes/9999/favorite/"), author).await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["kind"], "RECIPE_NOT_FOUND");
}

#[tokio::test]
async fn should_require_identity_for_favorites() {
    let (app, _, recipe) = app_with_recipe().await;

    let response = app
        .server
        .post(&format!("/recipes/{recipe}/favorite/"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ── Shopping cart ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_cart_item_once_then_report_missing() {
    let (app, author, recipe) = app_with_recipe().await;
    let path = format!("/recipes/{recipe}/shopping_cart/");

    as_user(app.server.post(&path), author)
        .await
        .assert_status(StatusCode::CREATED);
    as_user(app.server.delete(&path), author)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let again = as_user(app.server.delete(&path), author).await;
    again.assert_status(StatusCode::BAD_REQUEST);
    let body = again.json::<Value>();
    assert_eq!(body["kind"], "RELATION_MISSING");
    assert_eq!(body["error"], "cart item does not exist");
}

#[tokio::test]
async fn should_not_remove_another_users_cart_item() {
    let (app, author, recipe) = app_with_recipe().await;
    let other = seed_user(&app.db, "clara", UserRole::Normal).await;
    let path = format!("/recipes/{recipe}/shopping_cart/");

    as_user(app.server.post(&path), author)
        .await
        .assert_status(StatusCode::CREATED);
    as_user(app.server.delete(&path), other)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let detail = as_user(app.server.get(&format!("/recipes/{recipe}/")), author).await;
    assert_eq!(detail.json::<Value>()["is_in_shopping_cart"], true);
}

// ── Subscriptions ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_self_subscription() {
    let app = spawn_app().await;
    let user = seed_user(&app.db, "anna", UserRole::Normal).await;

    let response = as_user(
        app.server
            .post(&format!("/users/{}/subscribe/", user.user_id)),
        user,
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "SELF_SUBSCRIPTION");
}

#[tokio::test]
async fn should_subscribe_with_limited_recipe_preview() {
    let (app, author, _) = app_with_recipe().await;
    let tag = seed_tag(&app.db, "Lunch", "lunch").await;
    let rice = seed_ingredient(&app.db, "rice", "g").await;
    create_recipe(&app, author, &recipe_body("Pilaf", &[tag], &[(rice, 300)])).await;
    create_recipe(&app, author, &recipe_body("Risotto", &[tag], &[(rice, 250)])).await;
    let follower = seed_user(&app.db, "boris", UserRole::Normal).await;

    let response = as_user(
        app.server
            .post(&format!("/users/{}/subscribe/", author.user_id))
            .add_query_param("recipes_limit", 2),
        follower,
    )
    .await;
    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["username"], "anna");
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    assert_eq!(body["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(body["recipes"][0]["name"], "Risotto");

    let list = as_user(app.server.get("/users/subscriptions/"), follower).await;
    list.assert_status_ok();
    let list = list.json::<Value>();
    assert_eq!(list["count"], 1);
    assert_eq!(list["results"][0]["id"], author.user_id.to_string());
    assert_eq!(list["results"][0]["recipes"].as_array().unwrap().len(), 3);

    as_user(
        app.server
            .delete(&format!("/users/{}/subscribe/", author.user_id)),
        follower,
    )
    .await
    .assert_status(StatusCode::NO_CONTENT);
    let list = as_user(app.server.get("/users/subscriptions/"), follower).await;
    assert_eq!(list.json::<Value>()["count"], 0);
}
