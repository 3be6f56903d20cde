//! Domain entities - the core business objects.

mod author;
mod post;
pub mod validation;

pub use author::{Author, AuthorChanges, AuthorDraft, derive_display_name};
pub use post::{Comment, Post, PostChanges, PostDraft, PostView};
