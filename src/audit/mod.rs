//! Audit trail for budgetbook
//!
//! Every committed create, update and delete of a budget, expense or tag is
//! appended to `audit.log` as one JSON object per line. Updates carry a short
//! field-by-field summary of what changed.
//!
//! ```rust,ignore
//! use budgetbook::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::update(
//!     EntityType::Expense,
//!     expense.id.to_string(),
//!     Some(expense.title.clone()),
//!     &before,
//!     &expense,
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
