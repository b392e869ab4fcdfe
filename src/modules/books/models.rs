use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// A catalog entry. `id`, `title`, and `author` never change once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Surrogate key assigned by the store, never reissued
    pub id: i64,
    pub title: String,
    pub author: String,
    /// The only mutable field, flipped by the toggle endpoint
    pub is_available: bool,
}

/// Request body for `POST /api/books`.
///
/// Fields are optional so a missing field surfaces as a validation error
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBook {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

/// A validated book ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
}

impl CreateBook {
    /// Check that `title` and `author` are present and not blank.
    /// Every offending field is reported, not just the first.
    pub fn validate(self) -> Result<NewBook, CatalogError> {
        let mut missing = Vec::new();

        let title = present(self.title);
        if title.is_none() {
            missing.push("title");
        }
        let author = present(self.author);
        if author.is_none() {
            missing.push("author");
        }

        match (title, author) {
            (Some(title), Some(author)) => Ok(NewBook { title, author }),
            _ => Err(CatalogError::Validation { fields: missing }),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
