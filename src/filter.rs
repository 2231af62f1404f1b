//! Narrowing a snapshot of transactions by date, type and category.

use std::{collections::HashSet, ops::RangeInclusive};

use time::Date;

use crate::transaction::{Transaction, TransactionType};

/// Which categories a filter lets through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No restriction on category.
    Any,
    /// Only these categories. An empty set lets nothing through.
    OnlyThese(HashSet<String>),
}

impl CategoryFilter {
    fn allows(&self, category: &str) -> bool {
        match self {
            CategoryFilter::Any => true,
            CategoryFilter::OnlyThese(categories) => categories.contains(category),
        }
    }
}

/// The criteria a transaction must meet to be kept by [filter_transactions].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    /// The dates to keep, both ends inclusive.
    pub date_range: RangeInclusive<Date>,
    /// The transaction types to keep.
    pub types: HashSet<TransactionType>,
    /// The categories to keep.
    pub categories: CategoryFilter,
}

impl TransactionFilter {
    /// A filter that keeps every transaction.
    pub fn everything() -> Self {
        Self {
            date_range: Date::MIN..=Date::MAX,
            types: HashSet::from(TransactionType::ALL),
            categories: CategoryFilter::Any,
        }
    }

    /// Whether `transaction` satisfies every criterion of the filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.date_range.contains(&transaction.date)
            && self.types.contains(&transaction.type_)
            && self.categories.allows(&transaction.category)
    }
}

/// Keep the transactions in `snapshot` that match `filter`, preserving order.
pub fn filter_transactions(snapshot: &[Transaction], filter: &TransactionFilter) -> Vec<Transaction> {
    snapshot
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .cloned()
        .collect()
}
