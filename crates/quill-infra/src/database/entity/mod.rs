//! SeaORM entities backing the `authors` and `posts` tables.

pub mod author;
pub mod post;
