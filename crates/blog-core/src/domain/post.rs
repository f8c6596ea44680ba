use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationErrors;
use crate::pagination::Slice;
use crate::validation;

/// Longest title a post may carry, in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

/// The user a post belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub username: String,
}

/// Post entity - a blog post and its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

/// The client-writable part of a post.
///
/// Both create and update take a full set of fields; the author and the
/// identifiers are never taken from client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub content: String,
}

impl PostFields {
    /// Validate a decoded request body.
    ///
    /// Unknown keys (including any `author`) are ignored. Strings are trimmed.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let object = validation::expect_object(body)?;

        let mut errors = ValidationErrors::new();
        let title = validation::text_field(object, "title", &mut errors).map(str::trim);
        let content = validation::text_field(object, "content", &mut errors).map(str::trim);

        if let Some(title) = title
            && title.chars().count() > MAX_TITLE_LENGTH
        {
            errors.add(
                "title",
                format!("Ensure this field has no more than {MAX_TITLE_LENGTH} characters."),
            );
        }

        match (title, content) {
            (Some(title), Some(content)) => errors.into_result(Self {
                title: title.to_string(),
                content: content.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Selection of posts for listing and counting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub author_id: Option<i64>,
    pub author_username: Option<String>,
    pub slice: Option<Slice>,
}

impl PostQuery {
    /// Every post, in creation order.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_author_id(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Exact, case-sensitive match on the author's username.
    pub fn by_username(mut self, username: impl Into<String>) -> Self {
        self.author_username = Some(username.into());
        self
    }

    pub fn with_slice(mut self, slice: Slice) -> Self {
        self.slice = Some(slice);
        self
    }

    /// Whether `post` passes the filters. Slicing is not considered.
    pub fn matches(&self, post: &Post) -> bool {
        self.author_id.is_none_or(|id| post.author.id == id)
            && self
                .author_username
                .as_deref()
                .is_none_or(|name| post.author.username == name)
    }
}
