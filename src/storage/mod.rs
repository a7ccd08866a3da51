//! Storage layer for budgetbook
//!
//! JSON file storage with atomic writes. Each entity kind lives in its own
//! repository; [`Storage`] coordinates them, implements [`EntityStore`] for the
//! query engine, and wraps mutations so that a failed save rolls the
//! in-memory state back to what it was before the mutation.

pub mod budgets;
pub mod expenses;
pub mod file_io;
pub mod init;
pub mod store;
pub mod tags;

pub use budgets::BudgetRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::{dedupe_expense_titles, initialize_storage, seed_default_tags};
pub use store::{BudgetPredicate, EntityStore, ExpensePredicate};
pub use tags::TagRepository;

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BudgetPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, Expense, Tag, TagId};
use crate::query::{FilterCriteria, SortCriteria};

/// A persisted collection of one entity kind
pub trait Repository {
    type Record: Clone;

    /// Replace the in-memory state with what is on disk
    fn load(&self) -> BudgetResult<()>;

    /// Write the in-memory state to disk
    fn save(&self) -> BudgetResult<()>;

    /// Copy of every record currently held
    fn snapshot(&self) -> BudgetResult<Vec<Self::Record>>;

    /// Replace the in-memory state with a snapshot
    fn restore(&self, records: Vec<Self::Record>) -> BudgetResult<()>;
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BudgetPaths,
    audit: AuditLogger,
    pub budgets: BudgetRepository,
    pub expenses: ExpenseRepository,
    pub tags: TagRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BudgetPaths) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            tags: TagRepository::new(paths.tags_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), BudgetError> {
        self.budgets.load()?;
        self.expenses.load()?;
        self.tags.load()?;
        Ok(())
    }

    /// Apply `mutate` to `repo` and persist it
    ///
    /// If the mutation or the save fails, the repository is restored to its
    /// state before the call and the error is returned.
    pub fn write<R, T, F>(&self, repo: &R, mutate: F) -> BudgetResult<T>
    where
        R: Repository,
        F: FnOnce(&R) -> BudgetResult<T>,
    {
        let snapshot = repo.snapshot()?;

        let outcome = mutate(repo).and_then(|value| repo.save().map(|()| value));
        if let Err(err) = &outcome {
            warn!(error = %err, "write failed, rolling back in-memory changes");
            repo.restore(snapshot)?;
        }

        outcome
    }

    /// Apply `mutate` to two repositories and persist both, `first` then
    /// `second`
    ///
    /// If the mutation or either save fails, both repositories are restored to
    /// their state before the call and written back, so a save that already
    /// reached disk is undone too.
    pub fn write_both<A, B, T, F>(&self, first: &A, second: &B, mutate: F) -> BudgetResult<T>
    where
        A: Repository,
        B: Repository,
        F: FnOnce(&A, &B) -> BudgetResult<T>,
    {
        let first_snapshot = first.snapshot()?;
        let second_snapshot = second.snapshot()?;

        let outcome = mutate(first, second).and_then(|value| {
            first.save()?;
            second.save()?;
            Ok(value)
        });

        if let Err(err) = &outcome {
            warn!(error = %err, "paired write failed, rolling back both repositories");
            first.restore(first_snapshot)?;
            second.restore(second_snapshot)?;

            for resave in [first.save(), second.save()] {
                if let Err(resave_err) = resave {
                    warn!(error = %resave_err, "failed to write back restored repository");
                }
            }
        }

        outcome
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        let entry = AuditEntry::create(entity_type, entity_id, entity_name, entity);
        self.append_audit(&entry);
    }

    /// Record an update in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) {
        let entry = AuditEntry::update(entity_type, entity_id, entity_name, before, after);
        self.append_audit(&entry);
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        let entry = AuditEntry::delete(entity_type, entity_id, entity_name, entity);
        self.append_audit(&entry);
    }

    // Audit failures never undo a committed change
    fn append_audit(&self, entry: &AuditEntry) {
        if let Err(err) = self.audit.log(entry) {
            warn!(error = %err, entity = %entry.entity_type, "failed to append audit entry");
        }
    }

    fn expenses_matching(&self, filter: &FilterCriteria) -> BudgetResult<Vec<Expense>> {
        match filter {
            FilterCriteria::None => self.expenses.get_all(),
            FilterCriteria::ByTags(names) => {
                let tag_ids: BTreeSet<TagId> = self
                    .tags
                    .get_all()?
                    .into_iter()
                    .filter(|tag| names.contains(&tag.name))
                    .map(|tag| tag.id)
                    .collect();
                self.expenses.get_by_any_tag(&tag_ids)
            }
            other => {
                let names = self.tags.names_by_id()?;
                Ok(self
                    .expenses
                    .get_all()?
                    .into_iter()
                    .filter(|expense| other.matches(expense, &names))
                    .collect())
            }
        }
    }
}

impl EntityStore for Storage {
    fn fetch_budgets(&self, predicate: &BudgetPredicate) -> BudgetResult<Vec<Budget>> {
        debug!(?predicate, "fetching budgets");
        match predicate {
            BudgetPredicate::All => self.budgets.get_all(),
            BudgetPredicate::TitleEquals(title) => self.budgets.find_by_title(title),
        }
    }

    fn fetch_expenses(
        &self,
        predicate: &ExpensePredicate,
        sort: Option<SortCriteria>,
    ) -> BudgetResult<Vec<Expense>> {
        debug!(?predicate, ?sort, "fetching expenses");
        let mut expenses = match predicate {
            ExpensePredicate::All => self.expenses.get_all()?,
            ExpensePredicate::TitleEquals(title) => self.expenses.find_by_title(title)?,
            ExpensePredicate::InBudget(budget_id) => self.expenses.get_by_budget(*budget_id)?,
            ExpensePredicate::Matching(filter) => self.expenses_matching(filter)?,
        };

        if let Some(sort) = sort {
            sort.sort(&mut expenses);
        }

        Ok(expenses)
    }

    fn fetch_tags(&self) -> BudgetResult<Vec<Tag>> {
        self.tags.get_all()
    }
}
