use axum::http::StatusCode;
use serde_json::{Value, json};

use foodgram_domain::user::UserRole;

use crate::helpers::{as_user, seed_ingredient, seed_tag, seed_user, spawn_app};

// ── Tags ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_and_fetch_tags() {
    let app = spawn_app().await;
    let lunch = seed_tag(&app.db, "Lunch", "lunch").await;
    seed_tag(&app.db, "Breakfast", "breakfast").await;

    let list = app.server.get("/tags/").await.json::<Value>();
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Breakfast", "Lunch"]);

    let tag = app.server.get(&format!("/tags/{lunch}/")).await.json::<Value>();
    assert_eq!(tag["slug"], "lunch");
    assert_eq!(tag["color"], "#E26C2D");

    app.server
        .get("/tags/9999/")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_let_only_staff_create_tags() {
    let app = spawn_app().await;
    let normal = seed_user(&app.db, "anna", UserRole::Normal).await;
    let staff = seed_user(&app.db, "admin", UserRole::Staff).await;
    let body = json!({ "name": "Dinner", "color": "#0af", "slug": "dinner" });

    as_user(app.server.post("/tags/"), normal)
        .json(&body)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let created = as_user(app.server.post("/tags/"), staff).json(&body).await;
    created.assert_status(StatusCode::CREATED);
    assert_eq!(created.json::<Value>()["color"], "#00AAFF");

    let duplicate = as_user(app.server.post("/tags/"), staff).json(&body).await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);
}

// ── Ingredients ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_search_ingredients_by_name_fragment() {
    let app = spawn_app().await;
    seed_ingredient(&app.db, "flour", "g").await;
    seed_ingredient(&app.db, "wheat flour", "g").await;
    seed_ingredient(&app.db, "sugar", "g").await;

    let found = app
        .server
        .get("/ingredients/")
        .add_query_param("name", "FLOUR")
        .await
        .json::<Value>();
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["flour", "wheat flour"]);

    let all = app.server.get("/ingredients/").await.json::<Value>();
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn should_treat_like_wildcards_in_search_literally() {
    let app = spawn_app().await;
    seed_ingredient(&app.db, "flour", "g").await;
    seed_ingredient(&app.db, "salt 100%", "g").await;

    for (needle, expected) in [("f_our", vec![]), ("%", vec!["salt 100%"])] {
        let found = app
            .server
            .get("/ingredients/")
            .add_query_param("name", needle)
            .await
            .json::<Value>();
        let names: Vec<&str> = found
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, expected, "needle {needle}");
    }
}

#[tokio::test]
async fn should_match_query_typed_on_wrong_layout() {
    let app = spawn_app().await;
    seed_ingredient(&app.db, "молоко", "мл").await;
    seed_ingredient(&app.db, "сахар", "г").await;

    let found = app
        .server
        .get("/ingredients/")
        .add_query_param("name", "vjkjr")
        .await
        .json::<Value>();
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "молоко");
}

#[tokio::test]
async fn should_let_only_staff_create_ingredients() {
    let app = spawn_app().await;
    let normal = seed_user(&app.db, "anna", UserRole::Normal).await;
    let staff = seed_user(&app.db, "admin", UserRole::Staff).await;
    let body = json!({ "name": "Butter", "measurement_unit": "g" });

    as_user(app.server.post("/ingredients/"), normal)
        .json(&body)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let created = as_user(app.server.post("/ingredients/"), staff)
        .json(&body)
        .await;
    created.assert_status(StatusCode::CREATED);
    let id = created.json::<Value>()["id"].as_i64().unwrap();

    let fetched = app
        .server
        .get(&format!("/ingredients/{id}/"))
        .await
        .json::<Value>();
    assert_eq!(fetched["name"], "Butter");
    assert_eq!(fetched["measurement_unit"], "g");
}
