use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::repository::{ShoppingCartRepository, UserRepository};
use crate::domain::types::{ShoppingLine, ShoppingList};
use crate::error::FoodgramError;

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Render aggregated cart lines as the downloadable text file.
pub fn render_shopping_list(
    first_name: &str,
    generated_at: DateTime<Utc>,
    lines: &[ShoppingLine],
) -> String {
    let mut out = vec![
        "Shopping list for:".to_owned(),
        String::new(),
        first_name.to_owned(),
        generated_at.format(DATE_FORMAT).to_string(),
        String::new(),
    ];
    out.extend(
        lines
            .iter()
            .map(|line| format!("{}: {} {}", line.name, line.amount, line.measurement_unit)),
    );
    out.push(String::new());
    out.push("Calculated in Foodgram".to_owned());
    out.join("\n")
}

pub fn shopping_list_filename(username: &str) -> String {
    format!("{username}_shopping_list.txt")
}

// ── BuildShoppingList ────────────────────────────────────────────────────────

pub struct BuildShoppingListUseCase<C: ShoppingCartRepository, U: UserRepository> {
    pub cart: C,
    pub users: U,
}

impl<C: ShoppingCartRepository, U: UserRepository> BuildShoppingListUseCase<C, U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<ShoppingList, FoodgramError> {
        if self.cart.count_items(user_id).await? == 0 {
            return Err(FoodgramError::EmptyCart);
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(FoodgramError::UserNotFound)?;
        let lines = self.cart.aggregate(user_id).await?;
        Ok(ShoppingList {
            filename: shopping_list_filename(&user.username),
            content: render_shopping_list(&user.first_name, Utc::now(), &lines),
        })
    }
}
