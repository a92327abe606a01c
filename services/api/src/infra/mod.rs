pub mod db;
pub mod recipe;
