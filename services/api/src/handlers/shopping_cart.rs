use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::response::Attachment;

use foodgram_auth_types::identity::IdentityHeaders;

use crate::error::FoodgramError;
use crate::state::AppState;
use crate::usecase::shopping_list::BuildShoppingListUseCase;

// ── GET /recipes/download_shopping_cart/ ─────────────────────────────────────

pub async fn download_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Response, FoodgramError> {
    let usecase = BuildShoppingListUseCase {
        cart: state.shopping_cart_repo(),
        users: state.user_repo(),
    };
    let list = usecase.execute(identity.user_id).await?;
    Ok(Attachment::new(list.content)
        .filename(list.filename)
        .content_type("text/plain; charset=utf-8")
        .into_response())
}
