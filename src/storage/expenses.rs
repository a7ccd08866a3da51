//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json. Each expense stores
//! its owning budget and its tags; the reverse directions (budget -> expenses,
//! tag -> expenses) are kept as in-memory indexes rebuilt on load.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{BudgetId, Expense, ExpenseId, TagId};

use super::file_io::{read_json, write_json_atomic};
use super::Repository;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with indexing
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: budget_id -> expense_ids
    by_budget: RwLock<HashMap<BudgetId, BTreeSet<ExpenseId>>>,
    /// Index: tag_id -> expense_ids
    by_tag: RwLock<HashMap<TagId, BTreeSet<ExpenseId>>>,
}

/// Store order: oldest first, ties broken by id
fn natural_order(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_budget: RwLock::new(HashMap::new()),
            by_tag: RwLock::new(HashMap::new()),
        }
    }

    fn replace_all(&self, expenses: Vec<Expense>) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_budget = self
            .by_budget
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_tag = self
            .by_tag
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_budget.clear();
        by_tag.clear();

        for expense in expenses {
            if let Some(budget_id) = expense.budget_id {
                by_budget.entry(budget_id).or_default().insert(expense.id);
            }
            for tag_id in &expense.tag_ids {
                by_tag.entry(*tag_id).or_default().insert(expense.id);
            }
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all expenses in store order
    pub fn get_all(&self) -> Result<Vec<Expense>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        natural_order(&mut expenses);
        Ok(expenses)
    }

    /// Get the expenses attached to a budget
    pub fn get_by_budget(&self, budget_id: BudgetId) -> Result<Vec<Expense>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_budget = self
            .by_budget
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = by_budget
            .get(&budget_id)
            .into_iter()
            .flatten()
            .filter_map(|id| data.get(id).cloned())
            .collect();
        natural_order(&mut expenses);
        Ok(expenses)
    }

    /// Get expenses carrying at least one of the given tags
    pub fn get_by_any_tag(&self, tag_ids: &BTreeSet<TagId>) -> Result<Vec<Expense>, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_tag = self
            .by_tag
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids: BTreeSet<ExpenseId> = tag_ids
            .iter()
            .filter_map(|tag_id| by_tag.get(tag_id))
            .flatten()
            .copied()
            .collect();

        let mut expenses: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        natural_order(&mut expenses);
        Ok(expenses)
    }

    /// Get expenses whose title is exactly `title`
    pub fn find_by_title(&self, title: &str) -> Result<Vec<Expense>, BudgetError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|e| e.title == title)
            .collect())
    }

    /// Insert or update an expense, keeping the indexes in step
    pub fn upsert(&self, expense: Expense) -> Result<(), BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_budget = self
            .by_budget
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_tag = self
            .by_tag
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = data.get(&expense.id) {
            if let Some(budget_id) = old.budget_id {
                if let Some(ids) = by_budget.get_mut(&budget_id) {
                    ids.remove(&expense.id);
                }
            }
            for tag_id in &old.tag_ids {
                if let Some(ids) = by_tag.get_mut(tag_id) {
                    ids.remove(&expense.id);
                }
            }
        }

        if let Some(budget_id) = expense.budget_id {
            by_budget.entry(budget_id).or_default().insert(expense.id);
        }
        for tag_id in &expense.tag_ids {
            by_tag.entry(*tag_id).or_default().insert(expense.id);
        }

        data.insert(expense.id, expense);
        Ok(())
    }

    pub fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, BudgetError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_budget = self
            .by_budget
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_tag = self
            .by_tag
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let Some(expense) = data.remove(&id) else {
            return Ok(None);
        };

        if let Some(budget_id) = expense.budget_id {
            if let Some(ids) = by_budget.get_mut(&budget_id) {
                ids.remove(&id);
            }
        }
        for tag_id in &expense.tag_ids {
            if let Some(ids) = by_tag.get_mut(tag_id) {
                ids.remove(&id);
            }
        }

        Ok(Some(expense))
    }

    /// Delete every expense attached to a budget, returning what was removed
    pub fn delete_by_budget(&self, budget_id: BudgetId) -> Result<Vec<Expense>, BudgetError> {
        let attached = self.get_by_budget(budget_id)?;
        let mut removed = Vec::with_capacity(attached.len());
        for expense in attached {
            if let Some(expense) = self.delete(expense.id)? {
                removed.push(expense);
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self
            .data
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

impl Repository for ExpenseRepository {
    type Record = Expense;

    fn load(&self) -> Result<(), BudgetError> {
        let file_data: ExpenseData = read_json(&self.path)?;
        self.replace_all(file_data.expenses)
    }

    fn save(&self) -> Result<(), BudgetError> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    fn snapshot(&self) -> Result<Vec<Expense>, BudgetError> {
        self.get_all()
    }

    fn restore(&self, records: Vec<Expense>) -> Result<(), BudgetError> {
        self.replace_all(records)
    }
}
