use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use foodgram_domain::relation::RelationKind;

/// Foodgram API domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum FoodgramError {
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("action already performed previously")]
    AlreadyExists,
    #[error("{0} does not exist")]
    RelationMissing(RelationKind),
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
    #[error("shopping cart is empty")]
    EmptyCart,
    #[error("{0}")]
    ValidationFailed(String),
    #[error("username already taken")]
    UsernameTaken,
    #[error("email already taken")]
    EmailTaken,
    #[error("invalid password")]
    InvalidPassword,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl FoodgramError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::RelationMissing(_) => "RELATION_MISSING",
            Self::SelfSubscription => "SELF_SUBSCRIPTION",
            Self::EmptyCart => "EMPTY_CART",
            Self::ValidationFailed(_) => "VALIDATION_FAILED",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::RecipeNotFound
            | Self::UserNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists
            | Self::RelationMissing(_)
            | Self::SelfSubscription
            | Self::EmptyCart
            | Self::ValidationFailed(_)
            | Self::UsernameTaken
            | Self::EmailTaken
            | Self::InvalidPassword => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FoodgramError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        if matches!(self, Self::EmptyCart) {
            return status.into_response();
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "error": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
