use std::collections::HashSet;

use axum::http::StatusCode;
use serde_json::{Value, json};

use foodgram_domain::user::UserRole;
use foodgram_testing::auth::MockAuth;

use crate::helpers::{
    TestApp, as_user, create_recipe, recipe_body, seed_ingredient, seed_tag, seed_user,
    spawn_app,
};

struct Menu {
    app: TestApp,
    author: MockAuth,
    breakfast: i64,
    lunch: i64,
    dinner: i64,
    dinner_tag: i32,
}

/// Three recipes: Omelette [breakfast, lunch], Soup [lunch], Steak [dinner].
async fn menu() -> Menu {
    let app = spawn_app().await;
    let author = seed_user(&app.db, "anna", UserRole::Normal).await;
    let breakfast_tag = seed_tag(&app.db, "Breakfast", "breakfast").await;
    let lunch_tag = seed_tag(&app.db, "Lunch", "lunch").await;
    let dinner_tag = seed_tag(&app.db, "Dinner", "dinner").await;
    let egg = seed_ingredient(&app.db, "egg", "pcs").await;
    let beef = seed_ingredient(&app.db, "beef", "g").await;

    let breakfast = create_recipe(
        &app,
        author,
        &recipe_body("Omelette", &[breakfast_tag, lunch_tag], &[(egg, 3)]),
    )
    .await;
    let lunch = create_recipe(&app, author, &recipe_body("Soup", &[lunch_tag], &[(beef, 200)])).await;
    let dinner =
        create_recipe(&app, author, &recipe_body("Steak", &[dinner_tag], &[(beef, 400)])).await;
    Menu {
        app,
        author,
        breakfast,
        lunch,
        dinner,
        dinner_tag,
    }
}

fn result_ids(body: &Value) -> Vec<i64> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

// ── Listing and filters ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_newest_first_with_pagination() {
    let menu = menu().await;

    let body = menu
        .app
        .server
        .get("/recipes/")
        .add_query_param("limit", 2)
        .await
        .json::<Value>();
    assert_eq!(body["count"], 3);
    assert_eq!(result_ids(&body), vec![menu.dinner, menu.lunch]);

    let page_two = menu
        .app
        .server
        .get("/recipes/")
        .add_query_param("limit", 2)
        .add_query_param("page", 2)
        .await
        .json::<Value>();
    assert_eq!(result_ids(&page_two), vec![menu.breakfast]);
}

#[tokio::test]
async fn should_union_tag_filter_without_duplicates() {
    let menu = menu().await;

    for query in ["tags=breakfast,lunch", "tags=breakfast&tags=lunch"] {
        let body = menu
            .app
            .server
            .get(&format!("/recipes/?{query}"))
            .await
            .json::<Value>();
        assert_eq!(body["count"], 2, "query {query}");
        let ids = result_ids(&body);
        let unique: HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(unique, HashSet::from([menu.breakfast, menu.lunch]));
    }
}

#[tokio::test]
async fn should_ignore_membership_filter_for_anonymous_viewer() {
    let menu = menu().await;
    let viewer = seed_user(&menu.app.db, "boris", UserRole::Normal).await;
    as_user(
        menu.app
            .server
            .post(&format!("/recipes/{}/favorite/", menu.lunch)),
        viewer,
    )
    .await
    .assert_status(StatusCode::CREATED);

    let anonymous = menu
        .app
        .server
        .get("/recipes/?is_favorited=1")
        .await
        .json::<Value>();
    assert_eq!(anonymous["count"], 3);
    assert!(
        anonymous["results"]
            .as_array()
            .unwrap()
            .iter()
            .all(|r| r["is_favorited"] == false)
    );

    let favorited = as_user(menu.app.server.get("/recipes/?is_favorited=1"), viewer)
        .await
        .json::<Value>();
    assert_eq!(result_ids(&favorited), vec![menu.lunch]);
    assert_eq!(favorited["results"][0]["is_favorited"], true);

    let not_favorited = as_user(menu.app.server.get("/recipes/?is_favorited=0"), viewer)
        .await
        .json::<Value>();
    assert_eq!(result_ids(&not_favorited), vec![menu.dinner, menu.breakfast]);
}

#[tokio::test]
async fn should_filter_by_author() {
    let menu = menu().await;
    let other = seed_user(&menu.app.db, "clara", UserRole::Normal).await;
    let tag = seed_tag(&menu.app.db, "Dessert", "dessert").await;
    let sugar = seed_ingredient(&menu.app.db, "sugar", "g").await;
    let pie = create_recipe(&menu.app, other, &recipe_body("Pie", &[tag], &[(sugar, 100)])).await;

    let body = menu
        .app
        .server
        .get(&format!("/recipes/?author={}", other.user_id))
        .await
        .json::<Value>();
    assert_eq!(result_ids(&body), vec![pie]);
    assert_eq!(body["results"][0]["author"]["username"], "clara");
}

#[tokio::test]
async fn should_match_nothing_for_unparsable_author() {
    let menu = menu().await;

    let body = menu
        .app
        .server
        .get("/recipes/?author=nobody")
        .await
        .json::<Value>();
    assert_eq!(body["count"], 0);
    assert!(result_ids(&body).is_empty());
}

#[tokio::test]
async fn should_filter_by_shopping_cart_membership() {
    let menu = menu().await;
    let viewer = seed_user(&menu.app.db, "boris", UserRole::Normal).await;
    as_user(
        menu.app
            .server
            .post(&format!("/recipes/{}/shopping_cart/", menu.lunch)),
        viewer,
    )
    .await
    .assert_status(StatusCode::CREATED);

    let in_cart = as_user(menu.app.server.get("/recipes/?is_in_shopping_cart=1"), viewer)
        .await
        .json::<Value>();
    assert_eq!(result_ids(&in_cart), vec![menu.lunch]);
    assert_eq!(in_cart["results"][0]["is_in_shopping_cart"], true);

    let not_in_cart = as_user(menu.app.server.get("/recipes/?is_in_shopping_cart=0"), viewer)
        .await
        .json::<Value>();
    assert_eq!(result_ids(&not_in_cart), vec![menu.dinner, menu.breakfast]);
}

#[tokio::test]
async fn should_and_all_filter_dimensions() {
    let menu = menu().await;
    let other = seed_user(&menu.app.db, "clara", UserRole::Normal).await;
    let lettuce = seed_ingredient(&menu.app.db, "lettuce", "g").await;
    let salad = create_recipe(
        &menu.app,
        other,
        &recipe_body("Salad", &[menu.dinner_tag], &[(lettuce, 150)]),
    )
    .await;
    let viewer = seed_user(&menu.app.db, "boris", UserRole::Normal).await;
    for recipe in [menu.lunch, menu.dinner, salad] {
        as_user(
            menu.app
                .server
                .post(&format!("/recipes/{recipe}/favorite/")),
            viewer,
        )
        .await
        .assert_status(StatusCode::CREATED);
    }
    as_user(
        menu.app
            .server
            .post(&format!("/recipes/{}/shopping_cart/", menu.lunch)),
        viewer,
    )
    .await
    .assert_status(StatusCode::CREATED);

    let query = format!(
        "/recipes/?tags=lunch,dinner&author={}&is_favorited=1&is_in_shopping_cart=0",
        menu.author.user_id
    );
    let body = as_user(menu.app.server.get(&query), viewer)
        .await
        .json::<Value>();
    assert_eq!(body["count"], 1);
    assert_eq!(result_ids(&body), vec![menu.dinner]);
}

// ── Detail ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_recipe_detail_with_associations() {
    let menu = menu().await;

    let response = menu
        .app
        .server
        .get(&format!("/recipes/{}/", menu.breakfast))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["name"], "Omelette");
    assert_eq!(body["author"]["id"], menu.author.user_id.to_string());
    assert_eq!(body["tags"].as_array().unwrap().len(), 2);
    assert_eq!(body["ingredients"][0]["name"], "egg");
    assert_eq!(body["ingredients"][0]["amount"], 3);
    assert_eq!(body["is_in_shopping_cart"], false);

    menu.app
        .server
        .get("/recipes/9999/")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ── Writes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_identity_to_create() {
    let menu = menu().await;

    menu.app
        .server
        .post("/recipes/")
        .json(&recipe_body("Toast", &[1], &[(1, 1)]))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_out_of_range_cooking_time() {
    let menu = menu().await;
    let mut body = recipe_body("Toast", &[1], &[(1, 1)]);
    body["cooking_time"] = json!(0);

    let response = as_user(menu.app.server.post("/recipes/"), menu.author)
        .json(&body)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn should_report_missing_tags_as_validation_error() {
    let menu = menu().await;
    let mut body = recipe_body("Toast", &[menu.dinner_tag], &[(1, 1)]);
    body.as_object_mut().unwrap().remove("tags");

    let response = as_user(menu.app.server.post("/recipes/"), menu.author)
        .json(&body)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let error = response.json::<Value>();
    assert_eq!(error["kind"], "VALIDATION_FAILED");
    assert_eq!(error["error"], "at least one tag is required");

    let mut body = recipe_body("Toast", &[menu.dinner_tag], &[(1, 1)]);
    body.as_object_mut().unwrap().remove("ingredients");
    let response = as_user(menu.app.server.post("/recipes/"), menu.author)
        .json(&body)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "at least one ingredient is required"
    );
}

#[tokio::test]
async fn should_leave_associations_untouched_when_update_fails() {
    let menu = menu().await;
    let path = format!("/recipes/{}/", menu.breakfast);
    let before = menu.app.server.get(&path).await.json::<Value>();

    let mut body = recipe_body("Renamed", &[menu.dinner_tag], &[(9999, 10)]);
    body.as_object_mut().unwrap().remove("image");
    let response = as_user(menu.app.server.patch(&path), menu.author)
        .json(&body)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let after = menu.app.server.get(&path).await.json::<Value>();
    assert_eq!(after["name"], "Omelette");
    assert_eq!(after["tags"], before["tags"]);
    assert_eq!(after["ingredients"], before["ingredients"]);
}

#[tokio::test]
async fn should_replace_associations_on_update() {
    let menu = menu().await;
    let path = format!("/recipes/{}/", menu.breakfast);
    let milk = seed_ingredient(&menu.app.db, "milk", "ml").await;

    let mut body = recipe_body("Omelette", &[menu.dinner_tag], &[(milk, 100)]);
    body.as_object_mut().unwrap().remove("image");
    let response = as_user(menu.app.server.patch(&path), menu.author)
        .json(&body)
        .await;
    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["tags"].as_array().unwrap().len(), 1);
    assert_eq!(updated["tags"][0]["slug"], "dinner");
    assert_eq!(updated["ingredients"].as_array().unwrap().len(), 1);
    assert_eq!(updated["ingredients"][0]["name"], "milk");
    assert_eq!(updated["image"], "recipes/omelette.png");
}

#[tokio::test]
async fn should_forbid_non_author_and_allow_staff() {
    let menu = menu().await;
    let stranger = seed_user(&menu.app.db, "boris", UserRole::Normal).await;
    let staff = seed_user(&menu.app.db, "admin", UserRole::Staff).await;
    let path = format!("/recipes/{}/", menu.dinner);

    let response = as_user(menu.app.server.delete(&path), stranger).await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "FORBIDDEN");

    as_user(menu.app.server.delete(&path), staff)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    menu.app
        .server
        .get(&path)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
