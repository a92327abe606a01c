use axum_test::{TestRequest, TestServer};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ConnectOptions, Database,
    DatabaseConnection,
};
use serde_json::{Value, json};
use uuid::Uuid;

use foodgram_api::router::build_router;
use foodgram_api::state::AppState;
use foodgram_api_migration::{Migrator, MigratorTrait};
use foodgram_api_schema::{ingredients, tags, users};
use foodgram_domain::user::UserRole;
use foodgram_testing::auth::MockAuth;

// ── Test app ─────────────────────────────────────────────────────────────────

pub struct TestApp {
    pub server: TestServer,
    pub db: DatabaseConnection,
}

/// Router over a freshly migrated in-memory SQLite database.
///
/// The pool holds a single connection so every query sees the same database.
pub async fn spawn_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let server = TestServer::new(build_router(AppState { db: db.clone() })).unwrap();
    TestApp { server, db }
}

/// Attach gateway identity headers to a request.
pub fn as_user(request: TestRequest, auth: MockAuth) -> TestRequest {
    auth.header_pairs()
        .into_iter()
        .fold(request, |request, (name, value)| request.add_header(name, value))
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub async fn seed_user(db: &DatabaseConnection, username: &str, role: UserRole) -> MockAuth {
    let id = Uuid::now_v7();
    users::ActiveModel {
        id: Set(id),
        email: Set(format!("{username}@example.com")),
        username: Set(username.to_owned()),
        first_name: Set(capitalize(username)),
        last_name: Set("Tester".to_owned()),
        password_hash: Set(String::new()),
        is_active: Set(true),
        role: Set(i16::from(role.as_u8())),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .unwrap();
    MockAuth::new(id, role)
}

pub async fn seed_tag(db: &DatabaseConnection, name: &str, slug: &str) -> i32 {
    tags::ActiveModel {
        id: NotSet,
        name: Set(name.to_owned()),
        color: Set("#E26C2D".to_owned()),
        slug: Set(slug.to_owned()),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

pub async fn seed_ingredient(db: &DatabaseConnection, name: &str, unit: &str) -> i32 {
    ingredients::ActiveModel {
        id: NotSet,
        name: Set(name.to_owned()),
        measurement_unit: Set(unit.to_owned()),
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Minimal valid recipe body.
pub fn recipe_body(name: &str, tags: &[i32], ingredients: &[(i32, i32)]) -> Value {
    json!({
        "name": name,
        "text": "Mix everything and bake.",
        "image": format!("recipes/{}.png", name.to_lowercase()),
        "cooking_time": 30,
        "tags": tags,
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| json!({ "id": id, "amount": amount }))
            .collect::<Vec<_>>(),
    })
}

/// Create a recipe through the API and return its id.
pub async fn create_recipe(app: &TestApp, author: MockAuth, body: &Value) -> i64 {
    let response = as_user(app.server.post("/recipes/"), author).json(body).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}
