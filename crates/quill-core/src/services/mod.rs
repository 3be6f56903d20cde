//! Application services built on top of the ports.

mod blog;

pub use blog::{AuthorDeletion, BlogService};
