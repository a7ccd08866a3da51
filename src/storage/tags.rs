//! Tag repository for JSON storage
//!
//! Manages loading and saving tags to tags.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Tag, TagId};

use super::file_io::{read_json, write_json_atomic};
use super::Repository;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TagData {
    tags: Vec<Tag>,
}

/// Repository for tag persistence
pub struct TagRepository {
    path: PathBuf,
    data: RwLock<HashMap<TagId, Tag>>,
}

impl TagRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn replace_all(&self, tags: Vec<Tag>) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for tag in tags {
            data.insert(tag.id, tag);
        }
        Ok(())
    }

    pub fn get(&self, id: TagId) -> Result<Option<Tag>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all tags sorted by name
    pub fn get_all(&self) -> Result<Vec<Tag>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut tags: Vec<_> = data.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(tags)
    }

    /// Get every tag with exactly this name (names may repeat)
    pub fn find_by_name(&self, name: &str) -> Result<Vec<Tag>, BudgetError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| t.name == name)
            .collect())
    }

    /// Map of tag id to name, for resolving an expense's tags
    pub fn names_by_id(&self) -> Result<HashMap<TagId, String>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data
            .iter()
            .map(|(id, tag)| (*id, tag.name.clone()))
            .collect())
    }

    pub fn upsert(&self, tag: Tag) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(tag.id, tag);
        Ok(())
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

impl Repository for TagRepository {
    type Record = Tag;

    fn load(&self) -> Result<(), BudgetError> {
        let file_data: TagData = read_json(&self.path)?;
        self.replace_all(file_data.tags)
    }

    fn save(&self) -> Result<(), BudgetError> {
        let tags = self.get_all()?;
        write_json_atomic(&self.path, &TagData { tags })
    }

    fn snapshot(&self) -> Result<Vec<Tag>, BudgetError> {
        self.get_all()
    }

    fn restore(&self, records: Vec<Tag>) -> Result<(), BudgetError> {
        self.replace_all(records)
    }
}
