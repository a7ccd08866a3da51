//! Expense query engine
//!
//! - `criteria`: filter/sort selections and the builder that tracks them
//! - `executor`: turns criteria into store fetches

pub mod criteria;
pub mod executor;

pub use criteria::{
    Criteria, CriteriaBuilder, ExpenseQuery, FilterCriteria, SortCriteria, SortDirection,
    SortField,
};
pub use executor::{execute, run};
