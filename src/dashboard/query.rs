//! The dashboard's filter panel as a query string.
//!
//! The same query string drives both the dashboard and its CSV download, so
//! both always show exactly the same transactions.

use std::collections::HashSet;

use serde::Deserialize;
use time::{Date, Duration};

use crate::{
    filter::{CategoryFilter, TransactionFilter, filter_transactions},
    transaction::{Transaction, TransactionType, sort_by_date_descending},
};

/// How many days before today the default date range starts.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// The query parameters submitted by the dashboard filter panel.
///
/// Parsed with `axum_extra`'s `Query`, which collects repeated checkbox
/// parameters such as `type=income&type=expense` into a `Vec`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct DashboardQuery {
    /// Whether the filter panel was submitted. Without it every transaction is shown.
    #[serde(default)]
    pub apply: bool,
    /// The first date to include.
    #[serde(default)]
    pub start: Option<Date>,
    /// The last date to include.
    #[serde(default)]
    pub end: Option<Date>,
    /// The checked transaction types.
    #[serde(default, rename = "type")]
    pub types: Vec<TransactionType>,
    /// The checked categories.
    #[serde(default, rename = "category")]
    pub categories: Vec<String>,
}

impl DashboardQuery {
    /// The filter to apply to the snapshot.
    ///
    /// Until the panel is submitted every transaction is kept. Once it is, missing
    /// dates fall back to the last [DEFAULT_LOOKBACK_DAYS] days up to `today`.
    pub fn to_filter(&self, today: Date) -> TransactionFilter {
        if !self.apply {
            return TransactionFilter::everything();
        }

        let (start, end) = self.date_range(today);

        TransactionFilter {
            date_range: start..=end,
            types: self.types.iter().copied().collect(),
            categories: CategoryFilter::OnlyThese(self.categories.iter().cloned().collect()),
        }
    }

    /// The start and end dates to show in the filter panel.
    pub fn date_range(&self, today: Date) -> (Date, Date) {
        let start = self
            .start
            .unwrap_or(today - Duration::days(DEFAULT_LOOKBACK_DAYS));
        let end = self.end.unwrap_or(today);

        (start, end)
    }

    /// Whether the type checkbox for `type_` should be checked.
    pub fn is_type_checked(&self, type_: TransactionType) -> bool {
        !self.apply || self.types.contains(&type_)
    }

    /// The categories whose checkboxes should be checked, out of `known_categories`.
    pub fn checked_categories(&self, known_categories: &[String]) -> HashSet<String> {
        if self.apply {
            self.categories.iter().cloned().collect()
        } else {
            known_categories.iter().cloned().collect()
        }
    }
}

/// The transactions to display for `query`, newest first.
pub fn displayed_transactions(
    snapshot: &[Transaction],
    query: &DashboardQuery,
    today: Date,
) -> Vec<Transaction> {
    let mut rows = filter_transactions(snapshot, &query.to_filter(today));
    sort_by_date_descending(&mut rows);

    rows
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        filter::CategoryFilter,
        transaction::{TransactionFields, TransactionStore, TransactionType},
    };

    use super::{DashboardQuery, displayed_transactions};

    const TODAY: time::Date = date!(2024 - 03 - 31);

    fn get_store() -> TransactionStore {
        let mut store = TransactionStore::new();
        let rows = [
            (date!(2024 - 01 - 15), "Rent", TransactionType::Expense, 900.0),
            (date!(2024 - 03 - 20), "Food", TransactionType::Expense, 42.5),
            (date!(2024 - 03 - 25), "Salary", TransactionType::Income, 2000.0),
            (date!(2024 - 03 - 20), "Food", TransactionType::Expense, 7.5),
        ];
        for (date, category, type_, amount) in rows {
            store.append(TransactionFields::new(date, category, type_, amount, "").unwrap());
        }

        store
    }

    #[test]
    fn parses_repeated_checkboxes() {
        let query: DashboardQuery = serde_html_form::from_str(
            "apply=true&start=2024-03-01&end=&type=income&type=expense&category=Food&category=Rent",
        )
        .unwrap();

        assert_eq!(
            query,
            DashboardQuery {
                apply: true,
                start: Some(date!(2024 - 03 - 01)),
                end: None,
                types: vec![TransactionType::Income, TransactionType::Expense],
                categories: vec!["Food".to_owned(), "Rent".to_owned()],
            }
        );
    }

    #[test]
    fn unsubmitted_panel_allows_any_category() {
        let query = DashboardQuery {
            categories: vec!["Food".to_owned()],
            ..Default::default()
        };

        let filter = query.to_filter(TODAY);

        assert_eq!(filter.categories, CategoryFilter::Any);
        assert_eq!(filter.types.len(), 2);
        assert!(filter.date_range.contains(&date!(1970 - 01 - 01)));
        assert!(filter.date_range.contains(&date!(2099 - 12 - 31)));
    }

    #[test]
    fn missing_dates_default_to_last_thirty_days() {
        let query = DashboardQuery {
            apply: true,
            ..Default::default()
        };

        let filter = query.to_filter(TODAY);

        assert_eq!(filter.date_range, date!(2024 - 03 - 01)..=TODAY);
        assert!(filter.types.is_empty());
        assert_eq!(
            filter.categories,
            CategoryFilter::OnlyThese(Default::default())
        );
    }

    #[test]
    fn unfiltered_rows_are_sorted_newest_first() {
        let store = get_store();

        let rows = displayed_transactions(&store.read_all(), &DashboardQuery::default(), TODAY);

        let ids: Vec<_> = rows.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, [2, 3, 1, 0]);
    }

    #[test]
    fn applied_filter_narrows_rows() {
        let store = get_store();
        let query = DashboardQuery {
            apply: true,
            start: Some(date!(2024 - 01 - 01)),
            end: Some(TODAY),
            types: vec![TransactionType::Expense],
            categories: vec!["Food".to_owned(), "Rent".to_owned()],
        };

        let rows = displayed_transactions(&store.read_all(), &query, TODAY);

        let ids: Vec<_> = rows.iter().map(|transaction| transaction.id).collect();
        assert_eq!(ids, [3, 1, 0]);
    }

    #[test]
    fn unchecking_every_category_shows_nothing() {
        let store = get_store();
        let query = DashboardQuery {
            apply: true,
            start: Some(date!(2024 - 01 - 01)),
            end: Some(TODAY),
            types: TransactionType::ALL.to_vec(),
            categories: vec![],
        };

        assert!(displayed_transactions(&store.read_all(), &query, TODAY).is_empty());
    }

    #[test]
    fn checkboxes_default_to_checked() {
        let query = DashboardQuery::default();
        let known = vec!["Food".to_owned(), "Rent".to_owned()];

        assert!(query.is_type_checked(TransactionType::Income));
        assert!(query.is_type_checked(TransactionType::Expense));
        assert_eq!(query.checked_categories(&known).len(), 2);
    }
}
