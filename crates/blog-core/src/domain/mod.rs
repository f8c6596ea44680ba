//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{Author, MAX_TITLE_LENGTH, Post, PostFields, PostQuery};
pub use user::{NewUser, User};
