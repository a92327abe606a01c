use axum::http::StatusCode;

use foodgram_domain::user::UserRole;

use crate::helpers::{
    as_user, create_recipe, recipe_body, seed_ingredient, seed_tag, seed_user, spawn_app,
};

#[tokio::test]
async fn should_reject_download_of_empty_cart() {
    let app = spawn_app().await;
    let user = seed_user(&app.db, "anna", UserRole::Normal).await;

    let response = as_user(app.server.get("/recipes/download_shopping_cart/"), user).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn should_sum_amounts_of_same_ingredient_across_recipes() {
    let app = spawn_app().await;
    let user = seed_user(&app.db, "anna", UserRole::Normal).await;
    let tag = seed_tag(&app.db, "Baking", "baking").await;
    let flour = seed_ingredient(&app.db, "flour", "g").await;
    let sugar = seed_ingredient(&app.db, "sugar", "g").await;
    let bread = create_recipe(&app, user, &recipe_body("Bread", &[tag], &[(flour, 200)])).await;
    let cake = create_recipe(
        &app,
        user,
        &recipe_body("Cake", &[tag], &[(flour, 300), (sugar, 50)]),
    )
    .await;
    for recipe in [bread, cake] {
        as_user(
            app.server.post(&format!("/recipes/{recipe}/shopping_cart/")),
            user,
        )
        .await
        .assert_status(StatusCode::CREATED);
    }

    let response = as_user(app.server.get("/recipes/download_shopping_cart/"), user).await;
    response.assert_status_ok();
    let disposition = response.header("content-disposition");
    assert!(
        disposition
            .to_str()
            .unwrap()
            .contains("anna_shopping_list.txt")
    );

    let text = response.text();
    assert!(text.starts_with("Shopping list for:\n\nAnna\n"));
    assert_eq!(text.matches("flour").count(), 1);
    let flour_at = text.find("flour: 500 g").unwrap();
    let sugar_at = text.find("sugar: 50 g").unwrap();
    assert!(flour_at < sugar_at);
    assert!(text.ends_with("\n\nCalculated in Foodgram"));
}

#[tokio::test]
async fn should_only_include_own_cart() {
    let app = spawn_app().await;
    let anna = seed_user(&app.db, "anna", UserRole::Normal).await;
    let boris = seed_user(&app.db, "boris", UserRole::Normal).await;
    let tag = seed_tag(&app.db, "Soup", "soup").await;
    let beet = seed_ingredient(&app.db, "beet", "pcs").await;
    let salt = seed_ingredient(&app.db, "salt", "g").await;
    let borscht = create_recipe(&app, anna, &recipe_body("Borscht", &[tag], &[(beet, 2)])).await;
    let brine = create_recipe(&app, boris, &recipe_body("Brine", &[tag], &[(salt, 40)])).await;
    as_user(
        app.server.post(&format!("/recipes/{borscht}/shopping_cart/")),
        anna,
    )
    .await
    .assert_status(StatusCode::CREATED);
    as_user(
        app.server.post(&format!("/recipes/{brine}/shopping_cart/")),
        boris,
    )
    .await
    .assert_status(StatusCode::CREATED);

    let text = as_user(app.server.get("/recipes/download_shopping_cart/"), anna)
        .await
        .text();
    assert!(text.contains("beet: 2 pcs"));
    assert!(!text.contains("salt"));
}

#[tokio::test]
async fn should_require_identity_for_download() {
    let app = spawn_app().await;

    app.server
        .get("/recipes/download_shopping_cart/")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
