use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use foodgram_api::domain::repository::UserRepository;
use foodgram_api::domain::types::User;
use foodgram_api::error::FoodgramError;
use foodgram_api::infra::db::DbUserRepository;
use foodgram_auth_types::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use foodgram_domain::user::UserRole;
use foodgram_testing::auth::MockAuth;

use crate::helpers::{as_user, seed_user, spawn_app};

fn registration(username: &str) -> Value {
    json!({
        "email": format!("{username}@Example.com"),
        "username": username,
        "first_name": "Anna",
        "last_name": "Karenina",
        "password": "correct horse",
    })
}

#[tokio::test]
async fn should_register_user_and_reject_taken_username() {
    let app = spawn_app().await;

    let response = app.server.post("/users/").json(&registration("anna")).await;
    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["username"], "anna");
    assert_eq!(body["email"], "anna@example.com");
    assert!(body.get("password").is_none());

    let again = app.server.post("/users/").json(&registration("anna")).await;
    again.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(again.json::<Value>()["kind"], "USERNAME_TAKEN");
}

#[tokio::test]
async fn should_reject_mixed_alphabet_username() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/users/")
        .json(&registration("annaанна"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn should_change_password_only_with_current_one() {
    let app = spawn_app().await;
    let registered = app
        .server
        .post("/users/")
        .json(&registration("anna"))
        .await
        .json::<Value>();
    let id: Uuid = registered["id"].as_str().unwrap().parse().unwrap();
    let auth = MockAuth::normal(id);

    let wrong = as_user(app.server.post("/users/set_password/"), auth)
        .json(&json!({ "current_password": "wrong guess", "new_password": "brand new pass" }))
        .await;
    wrong.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(wrong.json::<Value>()["kind"], "INVALID_PASSWORD");

    as_user(app.server.post("/users/set_password/"), auth)
        .json(&json!({ "current_password": "correct horse", "new_password": "brand new pass" }))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let stale = as_user(app.server.post("/users/set_password/"), auth)
        .json(&json!({ "current_password": "correct horse", "new_password": "another pass" }))
        .await;
    stale.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_return_current_user_only_with_identity() {
    let app = spawn_app().await;
    let anna = seed_user(&app.db, "anna", UserRole::Normal).await;

    app.server
        .get("/users/me/")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = as_user(app.server.get("/users/me/"), anna).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["username"], "anna");
    assert_eq!(body["is_subscribed"], false);
}

#[tokio::test]
async fn should_reject_malformed_identity() {
    let app = spawn_app().await;

    app.server
        .get("/users/")
        .add_header(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_static("not-a-uuid"),
        )
        .add_header(
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_static("0"),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_show_subscription_flag_to_follower_only() {
    let app = spawn_app().await;
    let anna = seed_user(&app.db, "anna", UserRole::Normal).await;
    let boris = seed_user(&app.db, "boris", UserRole::Normal).await;
    as_user(
        app.server
            .post(&format!("/users/{}/subscribe/", anna.user_id)),
        boris,
    )
    .await
    .assert_status(StatusCode::CREATED);

    let path = format!("/users/{}/", anna.user_id);
    let seen_by_boris = as_user(app.server.get(&path), boris).await.json::<Value>();
    assert_eq!(seen_by_boris["is_subscribed"], true);

    let anonymous = app.server.get(&path).await.json::<Value>();
    assert_eq!(anonymous["is_subscribed"], false);

    app.server
        .get(&format!("/users/{}/", Uuid::now_v7()))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_paginate_user_list() {
    let app = spawn_app().await;
    seed_user(&app.db, "anna", UserRole::Normal).await;
    seed_user(&app.db, "boris", UserRole::Normal).await;

    let body = app
        .server
        .get("/users/")
        .add_query_param("limit", 1)
        .await
        .json::<Value>();
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["username"], "anna");
}

#[tokio::test]
async fn should_report_which_unique_field_collided_on_insert() {
    let app = spawn_app().await;
    seed_user(&app.db, "anna", UserRole::Normal).await;
    let repo = DbUserRepository { db: app.db.clone() };
    let user = |username: &str, email: &str| User {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        username: username.to_owned(),
        first_name: "Boris".to_owned(),
        last_name: "Tester".to_owned(),
        password_hash: String::new(),
        is_active: true,
        role: UserRole::Normal,
        created_at: chrono::Utc::now(),
    };

    let same_email = repo.create(&user("boris", "anna@example.com")).await;
    assert!(matches!(same_email, Err(FoodgramError::EmailTaken)));

    let same_username = repo.create(&user("anna", "boris@example.com")).await;
    assert!(matches!(same_username, Err(FoodgramError::UsernameTaken)));
}
