//! Filter and sort criteria for expense queries
//!
//! Exactly one filter and at most one sort are active at a time. Selecting a
//! new filter replaces the previous filter entirely; there is no conjunction
//! across filter kinds. The [`CriteriaBuilder`] also remembers which of the two
//! selections changed last, because a plain [`execute`](super::execute) runs
//! only that one.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::models::{Expense, Money, TagId};

/// Which expenses to select
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterCriteria {
    /// Select every expense
    #[default]
    None,
    /// Expense has at least one tag whose name is in the set
    ByTags(BTreeSet<String>),
    /// `min <= amount <= max`
    ByPriceRange { min: Money, max: Money },
    /// Title starts with the prefix (case-sensitive)
    ByTitlePrefix(String),
    /// `start <= created_at <= end`
    ByDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl FilterCriteria {
    pub fn by_tags<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ByTags(names.into_iter().map(Into::into).collect())
    }

    pub fn by_price_range(min: Money, max: Money) -> Self {
        Self::ByPriceRange { min, max }
    }

    pub fn by_title_prefix(prefix: impl Into<String>) -> Self {
        Self::ByTitlePrefix(prefix.into())
    }

    pub fn by_date_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::ByDateRange { start, end }
    }

    /// Date range covering whole calendar days, from the start of `first` to
    /// the last instant of `last` (UTC)
    pub fn by_days(first: NaiveDate, last: NaiveDate) -> Self {
        let start = first.and_time(NaiveTime::MIN).and_utc();
        let end = match last.checked_add_days(Days::new(1)) {
            Some(next) => {
                next.and_time(NaiveTime::MIN).and_utc() - chrono::Duration::nanoseconds(1)
            }
            None => DateTime::<Utc>::MAX_UTC,
        };
        Self::ByDateRange { start, end }
    }

    /// Check whether an expense satisfies this filter
    ///
    /// `tag_names` maps tag ids to names; tags missing from the map are
    /// treated as unnamed and never match a tag filter.
    pub fn matches(&self, expense: &Expense, tag_names: &HashMap<TagId, String>) -> bool {
        match self {
            Self::None => true,
            Self::ByTags(names) => expense
                .tag_ids
                .iter()
                .filter_map(|id| tag_names.get(id))
                .any(|name| names.contains(name)),
            Self::ByPriceRange { min, max } => *min <= expense.amount && expense.amount <= *max,
            Self::ByTitlePrefix(prefix) => expense.title.starts_with(prefix.as_str()),
            Self::ByDateRange { start, end } => {
                *start <= expense.created_at && expense.created_at <= *end
            }
        }
    }

    /// Short identifier of the filter kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ByTags(_) => "tags",
            Self::ByPriceRange { .. } => "priceRange",
            Self::ByTitlePrefix(_) => "title",
            Self::ByDateRange { .. } => "date",
        }
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "all expenses"),
            Self::ByTags(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                write!(f, "tagged {}", names.join(" or "))
            }
            Self::ByPriceRange { min, max } => write!(f, "price {} to {}", min, max),
            Self::ByTitlePrefix(prefix) => write!(f, "title starting with '{}'", prefix),
            Self::ByDateRange { start, end } => write!(
                f,
                "created {} to {}",
                start.format("%Y-%m-%d %H:%M"),
                end.format("%Y-%m-%d %H:%M")
            ),
        }
    }
}

/// Field to order expenses by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    DateCreated,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "Title"),
            Self::DateCreated => write!(f, "Date"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "Ascending"),
            Self::Descending => write!(f, "Descending"),
        }
    }
}

/// An explicit ordering of expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortCriteria {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortCriteria {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: SortField) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Compare two expenses under this ordering
    ///
    /// Titles compare byte-wise, matching the store's default collation.
    pub fn compare(&self, a: &Expense, b: &Expense) -> Ordering {
        let ordering = match self.field {
            SortField::Title => a.title.cmp(&b.title),
            SortField::DateCreated => a.created_at.cmp(&b.created_at),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Stable-sort a slice of expenses in place
    pub fn sort(&self, expenses: &mut [Expense]) {
        expenses.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for SortCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.field, self.direction)
    }
}

/// The most recently changed selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    Filter(FilterCriteria),
    Sort(SortCriteria),
}

/// A filter and an ordering applied together
///
/// The filter runs first and the matches are then ordered, so sorting never
/// discards an active filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpenseQuery {
    pub filter: FilterCriteria,
    pub sort: Option<SortCriteria>,
}

impl ExpenseQuery {
    pub fn new(filter: FilterCriteria, sort: Option<SortCriteria>) -> Self {
        Self { filter, sort }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Filter,
    Sort,
}

/// Holds the active filter and sort selections
#[derive(Debug, Clone, Default)]
pub struct CriteriaBuilder {
    filter: FilterCriteria,
    sort: Option<SortCriteria>,
    last: Option<Selection>,
}

impl CriteriaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active filter
    pub fn select_filter(&mut self, filter: FilterCriteria) -> &mut Self {
        self.filter = filter;
        self.last = Some(Selection::Filter);
        self
    }

    /// Replace the active sort
    pub fn select_sort(&mut self, sort: SortCriteria) -> &mut Self {
        self.sort = Some(sort);
        self.last = Some(Selection::Sort);
        self
    }

    /// Go back to "show all"
    pub fn show_all(&mut self) -> &mut Self {
        self.select_filter(FilterCriteria::None)
    }

    /// Drop the explicit ordering; store order applies again
    pub fn clear_sort(&mut self) -> &mut Self {
        self.sort = None;
        if self.last == Some(Selection::Sort) {
            self.last = Some(Selection::Filter);
        }
        self
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn sort(&self) -> Option<SortCriteria> {
        self.sort
    }

    /// The selection changed most recently, or `None` before any selection
    pub fn current(&self) -> Option<Criteria> {
        match self.last? {
            Selection::Filter => Some(Criteria::Filter(self.filter.clone())),
            Selection::Sort => self.sort.map(Criteria::Sort),
        }
    }

    /// Both selections as a single composed query
    pub fn composed(&self) -> ExpenseQuery {
        ExpenseQuery::new(self.filter.clone(), self.sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tag_names(pairs: &[(TagId, &str)]) -> HashMap<TagId, String> {
        pairs
            .iter()
            .map(|(id, name)| (*id, name.to_string()))
            .collect()
    }

    #[test]
    fn test_none_matches_everything() {
        let expense = Expense::new("Anything", Money::from_cents(1), 1);
        assert!(FilterCriteria::None.matches(&expense, &HashMap::new()));
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let filter =
            FilterCriteria::by_price_range(Money::from_cents(500), Money::from_cents(1000));
        let names = HashMap::new();

        let at_min = Expense::new("A", Money::from_cents(500), 1);
        let at_max = Expense::new("B", Money::from_cents(1000), 1);
        let below = Expense::new("C", Money::from_cents(499), 1);
        let above = Expense::new("D", Money::from_cents(1001), 1);

        assert!(filter.matches(&at_min, &names));
        assert!(filter.matches(&at_max, &names));
        assert!(!filter.matches(&below, &names));
        assert!(!filter.matches(&above, &names));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let filter = FilterCriteria::by_date_range(start, end);
        let names = HashMap::new();

        let on_start = Expense::new("A", Money::zero(), 1).with_created_at(start);
        let on_end = Expense::new("B", Money::zero(), 1).with_created_at(end);
        let created_at =
            |title: &str, at| Expense::new(title, Money::zero(), 1).with_created_at(at);

        let before = created_at("C", start - chrono::Duration::seconds(1));
        let after = created_at("D", end + chrono::Duration::seconds(1));

        assert!(filter.matches(&on_start, &names));
        assert!(filter.matches(&on_end, &names));
        assert!(!filter.matches(&before, &names));
        assert!(!filter.matches(&after, &names));
    }

    #[test]
    fn test_by_days_covers_whole_days() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let filter = FilterCriteria::by_days(day, day);
        let names = HashMap::new();

        let morning = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 5, 10, 23, 59, 59).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 5, 11, 0, 0, 0).unwrap();

        let created_at = |at| Expense::new("A", Money::zero(), 1).with_created_at(at);

        assert!(filter.matches(&created_at(morning), &names));
        assert!(filter.matches(&created_at(night), &names));
        assert!(!filter.matches(&created_at(next_day), &names));
    }

    #[test]
    fn test_tags_match_any() {
        let food = TagId::new();
        let health = TagId::new();
        let travel = TagId::new();
        let names = tag_names(&[(food, "Food"), (health, "Health"), (travel, "Travel")]);

        let cookie = Expense::new("Cookie", Money::from_cents(845), 1).with_tags([food, travel]);
        let milk = Expense::new("Milk", Money::from_cents(545), 1).with_tags([health]);
        let untagged = Expense::new("Gum", Money::from_cents(100), 1);

        let filter = FilterCriteria::by_tags(["Food", "Groceries"]);
        assert!(filter.matches(&cookie, &names));
        assert!(!filter.matches(&milk, &names));
        assert!(!filter.matches(&untagged, &names));

        let either = FilterCriteria::by_tags(["Health", "Travel"]);
        assert!(either.matches(&cookie, &names));
        assert!(either.matches(&milk, &names));
    }

    #[test]
    fn test_empty_tag_set_matches_nothing() {
        let food = TagId::new();
        let names = tag_names(&[(food, "Food")]);
        let cookie = Expense::new("Cookie", Money::from_cents(845), 1).with_tags([food]);

        let filter = FilterCriteria::by_tags(Vec::<String>::new());
        assert!(!filter.matches(&cookie, &names));
    }

    #[test]
    fn test_title_prefix_is_case_sensitive() {
        let names = HashMap::new();
        let filter = FilterCriteria::by_title_prefix("Coo");

        assert!(filter.matches(&Expense::new("Cookie", Money::zero(), 1), &names));
        assert!(!filter.matches(&Expense::new("Corn", Money::zero(), 1), &names));
        assert!(!filter.matches(&Expense::new("cookie", Money::zero(), 1), &names));
        let anything = Expense::new("x", Money::zero(), 1);
        assert!(FilterCriteria::by_title_prefix("").matches(&anything, &names));
    }

    #[test]
    fn test_sort_by_title() {
        let mut expenses: Vec<Expense> = ["Banana", "Apple", "Cherry"]
            .iter()
            .map(|t| Expense::new(*t, Money::zero(), 1))
            .collect();

        SortCriteria::ascending(SortField::Title).sort(&mut expenses);
        let titles: Vec<_> = expenses.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Apple", "Banana", "Cherry"]);

        SortCriteria::descending(SortField::Title).sort(&mut expenses);
        let titles: Vec<_> = expenses.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Cherry", "Banana", "Apple"]);
    }

    #[test]
    fn test_sort_by_date() {
        let day = |d| Utc.with_ymd_and_hms(2024, 1, d, 9, 0, 0).unwrap();
        let mut expenses = vec![
            Expense::new("Second", Money::zero(), 1).with_created_at(day(2)),
            Expense::new("Third", Money::zero(), 1).with_created_at(day(3)),
            Expense::new("First", Money::zero(), 1).with_created_at(day(1)),
        ];

        SortCriteria::descending(SortField::DateCreated).sort(&mut expenses);
        let titles: Vec<_> = expenses.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Third", "Second", "First"]);
    }

    #[test]
    fn test_builder_last_selection_wins() {
        let mut builder = CriteriaBuilder::new();
        assert_eq!(builder.current(), None);

        builder.select_filter(FilterCriteria::by_title_prefix("Coo"));
        assert_eq!(
            builder.current(),
            Some(Criteria::Filter(FilterCriteria::by_title_prefix("Coo")))
        );

        let sort = SortCriteria::ascending(SortField::Title);
        builder.select_sort(sort);
        assert_eq!(builder.current(), Some(Criteria::Sort(sort)));

        // The filter is still held and shows up in the composed query
        assert_eq!(builder.filter(), &FilterCriteria::by_title_prefix("Coo"));
        assert_eq!(
            builder.composed(),
            ExpenseQuery::new(FilterCriteria::by_title_prefix("Coo"), Some(sort))
        );
    }

    #[test]
    fn test_builder_new_filter_replaces_old() {
        let mut builder = CriteriaBuilder::new();
        builder.select_filter(FilterCriteria::by_title_prefix("Coo"));
        builder.select_filter(FilterCriteria::by_tags(["Food"]));
        assert_eq!(builder.filter(), &FilterCriteria::by_tags(["Food"]));

        builder.show_all();
        assert_eq!(builder.filter(), &FilterCriteria::None);
    }

    #[test]
    fn test_builder_clear_sort() {
        let mut builder = CriteriaBuilder::new();
        builder.select_sort(SortCriteria::descending(SortField::DateCreated));
        builder.clear_sort();

        assert_eq!(builder.sort(), None);
        assert_eq!(builder.current(), Some(Criteria::Filter(FilterCriteria::None)));
    }

    #[test]
    fn test_filter_kind() {
        assert_eq!(FilterCriteria::None.kind(), "none");
        assert_eq!(FilterCriteria::by_tags(["Food"]).kind(), "tags");
        assert_eq!(
            FilterCriteria::by_price_range(Money::zero(), Money::zero()).kind(),
            "priceRange"
        );
    }
}
