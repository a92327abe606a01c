//! Domain types shared across all Foodgram crates.
//!
//! Pure types and field rules with no framework dependencies.

pub mod layout;
pub mod pagination;
pub mod query;
pub mod recipe;
pub mod relation;
pub mod tag;
pub mod user;
