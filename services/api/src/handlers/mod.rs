use serde::Deserialize;

use foodgram_domain::pagination::PageRequest;

pub mod health;
pub mod ingredient;
pub mod recipe;
pub mod relation;
pub mod shopping_cart;
pub mod tag;
pub mod user;

// ── Query params ─────────────────────────────────────────────────────────────

/// `?page=&limit=` shared by the paginated list endpoints.
#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest {
            limit: self.limit.unwrap_or(default.limit),
            page: self.page.unwrap_or(default.page),
        }
    }
}
