use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation;
use crate::error::DomainError;

/// Author entity - owns zero or more posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all authors. Stored without surrounding whitespace.
    pub user_name: String,
}

impl Author {
    /// Create a new author with a generated id.
    pub fn new(first_name: String, last_name: String, user_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            user_name,
        }
    }

    /// Copy the allow-listed fields of `changes` onto this author.
    pub fn apply(&mut self, changes: AuthorChanges) {
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(user_name) = changes.user_name {
            self.user_name = user_name;
        }
    }
}

/// The name shown next to an author's posts.
pub fn derive_display_name(author: &Author) -> String {
    format!("{} {}", author.first_name, author.last_name)
        .trim()
        .to_string()
}

/// Unvalidated author creation input.
#[derive(Debug, Clone, Default)]
pub struct AuthorDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

impl AuthorDraft {
    /// Check required fields and build the author to insert.
    pub fn validate(self) -> Result<Author, DomainError> {
        let missing = validation::missing_fields(&[
            ("firstName", self.first_name.as_deref()),
            ("lastName", self.last_name.as_deref()),
            ("userName", self.user_name.as_deref()),
        ]);

        match (self.first_name, self.last_name, self.user_name) {
            (Some(first), Some(last), Some(user)) if missing.is_empty() => {
                Ok(Author::new(first, last, user.trim().to_string()))
            }
            _ => Err(DomainError::MissingFields(missing)),
        }
    }
}

/// Partial author update. These are the only author fields an update may touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

impl AuthorChanges {
    pub fn validate(self) -> Result<Self, DomainError> {
        let changes = Self {
            first_name: validation::non_blank("firstName", self.first_name)?,
            last_name: validation::non_blank("lastName", self.last_name)?,
            user_name: validation::non_blank("userName", self.user_name)?
                .map(|user| user.trim().to_string()),
        };
        if changes.is_empty() {
            return Err(DomainError::Validation(
                "Missing `firstName`, `lastName` or `userName` in request body".to_string(),
            ));
        }
        Ok(changes)
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.user_name.is_none()
    }
}
