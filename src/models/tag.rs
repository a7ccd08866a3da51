//! Tag model
//!
//! Free-form labels attached to expenses. Names are not required to be unique.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::TagId;

/// Tags created on first run
pub const DEFAULT_TAGS: [&str; 10] = [
    "Food",
    "Dining",
    "Travel",
    "Entertainment",
    "Shopping",
    "Transportation",
    "Utilities",
    "Groceries",
    "Health",
    "Education",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TagId::new(),
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), TagValidationError> {
        if self.name.trim().is_empty() {
            return Err(TagValidationError::EmptyName);
        }
        Ok(())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    EmptyName,
}

impl fmt::Display for TagValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Tag name cannot be empty"),
        }
    }
}

impl std::error::Error for TagValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_validation() {
        assert!(Tag::new("Food").validate().is_ok());
        assert_eq!(Tag::new(" ").validate(), Err(TagValidationError::EmptyName));
    }
}
