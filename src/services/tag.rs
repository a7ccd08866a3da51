//! Tag service

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Tag, TagId};
use crate::storage::Storage;

/// Service for tag management
pub struct TagService<'a> {
    storage: &'a Storage,
}

impl<'a> TagService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a tag; names are not required to be unique
    pub fn create(&self, name: &str) -> BudgetResult<Tag> {
        let tag = Tag::new(name.trim());
        tag.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage
            .write(&self.storage.tags, |repo| repo.upsert(tag.clone()))?;

        self.storage
            .log_create(EntityType::Tag, tag.id.to_string(), Some(tag.name.clone()), &tag);

        Ok(tag)
    }

    /// All tags sorted by name
    pub fn list(&self) -> BudgetResult<Vec<Tag>> {
        self.storage.tags.get_all()
    }

    /// Resolve tag names to ids
    ///
    /// Every tag carrying a given name is included. A name with no tag is an
    /// error.
    pub fn resolve_names<S: AsRef<str>>(&self, names: &[S]) -> BudgetResult<Vec<TagId>> {
        let mut ids = Vec::new();
        for name in names {
            let matches = self.storage.tags.find_by_name(name.as_ref())?;
            if matches.is_empty() {
                return Err(BudgetError::tag_not_found(name.as_ref()));
            }
            ids.extend(matches.into_iter().map(|t| t.id));
        }
        Ok(ids)
    }
}
