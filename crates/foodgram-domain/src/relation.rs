//! User relation kinds: favorites, cart items, subscriptions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a persisted user → target association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// User → recipe.
    Favorite,
    /// User → recipe placed in the shopping cart.
    CartItem,
    /// User → author.
    Subscription,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Favorite => "favorite",
            Self::CartItem => "cart item",
            Self::Subscription => "subscription",
        };
        f.write_str(s)
    }
}
