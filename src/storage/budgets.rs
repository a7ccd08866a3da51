//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Budget, BudgetId};

use super::file_io::{read_json, write_json_atomic};
use super::Repository;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    data: RwLock<HashMap<BudgetId, Budget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn replace_all(&self, budgets: Vec<Budget>) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for budget in budgets {
            data.insert(budget.id, budget);
        }
        Ok(())
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all budgets in creation order
    pub fn get_all(&self) -> Result<Vec<Budget>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut budgets: Vec<_> = data.values().cloned().collect();
        budgets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(budgets)
    }

    /// Get budgets whose title is exactly `title`
    pub fn find_by_title(&self, title: &str) -> Result<Vec<Budget>, BudgetError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|b| b.title == title)
            .collect())
    }

    pub fn upsert(&self, budget: Budget) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(budget.id, budget);
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> Result<bool, BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

impl Repository for BudgetRepository {
    type Record = Budget;

    fn load(&self) -> Result<(), BudgetError> {
        let file_data: BudgetData = read_json(&self.path)?;
        self.replace_all(file_data.budgets)
    }

    fn save(&self) -> Result<(), BudgetError> {
        let budgets = self.get_all()?;
        write_json_atomic(&self.path, &BudgetData { budgets })
    }

    fn snapshot(&self) -> Result<Vec<Budget>, BudgetError> {
        self.get_all()
    }

    fn restore(&self, records: Vec<Budget>) -> Result<(), BudgetError> {
        self.replace_all(records)
    }
}
