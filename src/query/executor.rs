//! Runs criteria against an entity store
//!
//! Reads never fail from the caller's point of view: a store error is logged
//! and the result degrades to an empty list so the interface stays usable.

use tracing::{debug, warn};

use crate::models::Expense;
use crate::storage::{EntityStore, ExpensePredicate};

use super::criteria::{Criteria, ExpenseQuery, FilterCriteria};

/// Run the most recently changed selection
///
/// A filter fetches matching expenses in store order. A sort fetches *all*
/// expenses in the requested order, ignoring any filter selected earlier.
pub fn execute<S: EntityStore + ?Sized>(criteria: &Criteria, store: &S) -> Vec<Expense> {
    let result = match criteria {
        Criteria::Filter(filter) => {
            debug!(filter = filter.kind(), "executing expense filter");
            store.fetch_expenses(&predicate_for(filter), None)
        }
        Criteria::Sort(sort) => {
            debug!(%sort, "executing expense sort");
            store.fetch_expenses(&ExpensePredicate::All, Some(*sort))
        }
    };

    result.unwrap_or_else(|err| {
        warn!(error = %err, "expense query failed, showing no results");
        Vec::new()
    })
}

/// Filter, then order the matches
pub fn run<S: EntityStore + ?Sized>(query: &ExpenseQuery, store: &S) -> Vec<Expense> {
    debug!(filter = query.filter.kind(), sort = ?query.sort, "executing composed expense query");

    store
        .fetch_expenses(&predicate_for(&query.filter), query.sort)
        .unwrap_or_else(|err| {
            warn!(error = %err, "expense query failed, showing no results");
            Vec::new()
        })
}

fn predicate_for(filter: &FilterCriteria) -> ExpensePredicate {
    match filter {
        FilterCriteria::None => ExpensePredicate::All,
        other => ExpensePredicate::Matching(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BudgetError, BudgetResult};
    use crate::models::{Budget, Money, Tag};
    use crate::query::{SortCriteria, SortField};
    use crate::storage::BudgetPredicate;
    use std::cell::Cell;
    use std::collections::HashMap;

    /// In-memory store with natural order = insertion order
    struct VecStore {
        expenses: Vec<Expense>,
        tags: Vec<Tag>,
    }

    impl VecStore {
        fn with_titles(titles: &[&str]) -> Self {
            Self {
                expenses: titles
                    .iter()
                    .map(|t| Expense::new(*t, Money::from_cents(100), 1))
                    .collect(),
                tags: Vec::new(),
            }
        }
    }

    impl EntityStore for VecStore {
        fn fetch_budgets(&self, _predicate: &BudgetPredicate) -> BudgetResult<Vec<Budget>> {
            Ok(Vec::new())
        }

        fn fetch_expenses(
            &self,
            predicate: &ExpensePredicate,
            sort: Option<SortCriteria>,
        ) -> BudgetResult<Vec<Expense>> {
            let names: HashMap<_, _> = self.tags.iter().map(|t| (t.id, t.name.clone())).collect();
            let mut matches: Vec<Expense> = self
                .expenses
                .iter()
                .filter(|e| match predicate {
                    ExpensePredicate::All => true,
                    ExpensePredicate::TitleEquals(title) => &e.title == title,
                    ExpensePredicate::InBudget(id) => e.budget_id == Some(*id),
                    ExpensePredicate::Matching(filter) => filter.matches(e, &names),
                })
                .cloned()
                .collect();
            if let Some(sort) = sort {
                sort.sort(&mut matches);
            }
            Ok(matches)
        }

        fn fetch_tags(&self) -> BudgetResult<Vec<Tag>> {
            Ok(self.tags.clone())
        }
    }

    /// Store whose expense fetch always fails
    struct FailingStore {
        calls: Cell<usize>,
    }

    impl EntityStore for FailingStore {
        fn fetch_budgets(&self, _predicate: &BudgetPredicate) -> BudgetResult<Vec<Budget>> {
            Err(BudgetError::Storage("disk on fire".into()))
        }

        fn fetch_expenses(
            &self,
            _predicate: &ExpensePredicate,
            _sort: Option<SortCriteria>,
        ) -> BudgetResult<Vec<Expense>> {
            self.calls.set(self.calls.get() + 1);
            Err(BudgetError::Storage("disk on fire".into()))
        }

        fn fetch_tags(&self) -> BudgetResult<Vec<Tag>> {
            Err(BudgetError::Storage("disk on fire".into()))
        }
    }

    fn titles(expenses: &[Expense]) -> Vec<&str> {
        expenses.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_title_prefix_filter() {
        let store = VecStore::with_titles(&["Cookie", "Milk", "Corn"]);
        let result = execute(
            &Criteria::Filter(FilterCriteria::by_title_prefix("Coo")),
            &store,
        );
        assert_eq!(titles(&result), ["Cookie"]);
    }

    #[test]
    fn test_none_filter_keeps_store_order() {
        let store = VecStore::with_titles(&["Banana", "Apple", "Cherry"]);
        let result = execute(&Criteria::Filter(FilterCriteria::None), &store);
        assert_eq!(titles(&result), ["Banana", "Apple", "Cherry"]);
    }

    #[test]
    fn test_sort_fetches_everything() {
        let store = VecStore::with_titles(&["Banana", "Apple", "Cherry"]);

        let asc = execute(
            &Criteria::Sort(SortCriteria::ascending(SortField::Title)),
            &store,
        );
        assert_eq!(titles(&asc), ["Apple", "Banana", "Cherry"]);

        let desc = execute(
            &Criteria::Sort(SortCriteria::descending(SortField::Title)),
            &store,
        );
        assert_eq!(titles(&desc), ["Cherry", "Banana", "Apple"]);
    }

    #[test]
    fn test_sort_after_filter_drops_the_filter() {
        // Last action wins: the sort replaces the filtered result set.
        let store = VecStore::with_titles(&["Cookie", "Milk", "Corn"]);
        let mut builder = crate::query::CriteriaBuilder::new();
        builder.select_filter(FilterCriteria::by_title_prefix("Co"));
        builder.select_sort(SortCriteria::ascending(SortField::Title));

        let criteria = builder.current().unwrap();
        let result = execute(&criteria, &store);
        assert_eq!(titles(&result), ["Cookie", "Corn", "Milk"]);
    }

    #[test]
    fn test_composed_query_keeps_the_filter() {
        // Filter first, then order the matches.
        let store = VecStore::with_titles(&["Cookie", "Milk", "Corn"]);
        let mut builder = crate::query::CriteriaBuilder::new();
        builder.select_filter(FilterCriteria::by_title_prefix("Co"));
        builder.select_sort(SortCriteria::descending(SortField::Title));

        let result = run(&builder.composed(), &store);
        assert_eq!(titles(&result), ["Corn", "Cookie"]);
    }

    #[test]
    fn test_store_failure_yields_empty_result() {
        let store = FailingStore { calls: Cell::new(0) };

        let filtered = execute(
            &Criteria::Filter(FilterCriteria::by_title_prefix("Coo")),
            &store,
        );
        assert!(filtered.is_empty());

        let sorted = execute(
            &Criteria::Sort(SortCriteria::ascending(SortField::DateCreated)),
            &store,
        );
        assert!(sorted.is_empty());

        assert!(run(&ExpenseQuery::default(), &store).is_empty());
        assert_eq!(store.calls.get(), 3);
    }
}
