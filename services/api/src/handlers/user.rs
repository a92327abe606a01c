use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_auth_types::identity::{IdentityHeaders, OptionalIdentity};
use foodgram_domain::pagination::Paginated;

use crate::domain::types::{Profile, SubscribedAuthor, User};
use crate::error::FoodgramError;
use crate::handlers::PageQuery;
use crate::handlers::recipe::ShortRecipeResponse;
use crate::state::AppState;
use crate::usecase::relation::ListSubscriptionsUseCase;
use crate::usecase::user::{
    GetUserUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase, SetPasswordInput,
    SetPasswordUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl From<Profile> for UserResponse {
    fn from(profile: Profile) -> Self {
        let user = profile.user;
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed: profile.is_subscribed,
        }
    }
}

/// Body returned by registration. Carries no viewer flags.
#[derive(Serialize)]
pub struct RegisteredUserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(serialize_with = "foodgram_core::serde::to_rfc3339_ms")]
    pub date_joined: chrono::DateTime<chrono::Utc>,
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            date_joined: user.created_at,
        }
    }
}

/// Followed author with a preview of their recipes.
#[derive(Serialize)]
pub struct SubscribedAuthorResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<ShortRecipeResponse>,
    pub recipes_count: u64,
}

impl From<SubscribedAuthor> for SubscribedAuthorResponse {
    fn from(sub: SubscribedAuthor) -> Self {
        Self {
            author: sub.author.into(),
            recipes: sub.recipes.into_iter().map(Into::into).collect(),
            recipes_count: sub.recipes_count,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct SubscriptionsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub recipes_limit: Option<u64>,
}

// ── POST /users/ ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredUserResponse>), FoodgramError> {
    let usecase = RegisterUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(RegisterUserInput {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/ ──────────────────────────────────────────────────────────────

pub async fn list_users(
    identity: OptionalIdentity,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<UserResponse>>, FoodgramError> {
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let page = usecase
        .execute(identity.user_id(), query.page_request())
        .await?;
    Ok(Json(page.map(UserResponse::from)))
}

// ── GET /users/me/ ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, FoodgramError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let profile = usecase
        .execute(identity.user_id, Some(identity.user_id))
        .await?;
    Ok(Json(profile.into()))
}

// ── GET /users/{id}/ ─────────────────────────────────────────────────────────

pub async fn get_user(
    identity: OptionalIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, FoodgramError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let profile = usecase.execute(id, identity.user_id()).await?;
    Ok(Json(profile.into()))
}

// ── POST /users/set_password/ ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn set_password(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<SetPasswordRequest>,
) -> Result<StatusCode, FoodgramError> {
    let usecase = SetPasswordUseCase {
        repo: state.user_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            SetPasswordInput {
                current_password: body.current_password,
                new_password: body.new_password,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/subscriptions/ ────────────────────────────────────────────────

pub async fn list_subscriptions(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<SubscriptionsQuery>,
) -> Result<Json<Paginated<SubscribedAuthorResponse>>, FoodgramError> {
    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .page_request();
    let usecase = ListSubscriptionsUseCase {
        repo: state.relation_repo(),
    };
    let authors = usecase
        .execute(identity.user_id, page, query.recipes_limit)
        .await?;
    Ok(Json(authors.map(SubscribedAuthorResponse::from)))
}
