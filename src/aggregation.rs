//! Sums and group-bys over a snapshot of transactions.
//!
//! These functions never filter by date or category, callers pass in an
//! already filtered snapshot if they need to.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
};

use time::Date;

use crate::transaction::{Transaction, TransactionType};

/// A calendar month, e.g. January 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    #[cfg(test)]
    pub fn new(year: i32, month: u8) -> Self {
        Self { year, month }
    }
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month().into(),
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Income, expenses and the resulting balance for a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    pub count: usize,
}

/// The sum of the amounts of the transactions of type `type_`.
pub fn total_by_type(rows: &[Transaction], type_: TransactionType) -> f64 {
    rows.iter()
        .filter(|transaction| transaction.type_ == type_)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Total income minus total expenses.
pub fn balance(rows: &[Transaction]) -> f64 {
    total_by_type(rows, TransactionType::Income) - total_by_type(rows, TransactionType::Expense)
}

pub fn summarize(rows: &[Transaction]) -> Summary {
    Summary {
        income: total_by_type(rows, TransactionType::Income),
        expense: total_by_type(rows, TransactionType::Expense),
        balance: balance(rows),
        count: rows.len(),
    }
}

/// Sum amounts per (month, type).
///
/// Iterating the map yields months in ascending order with income before
/// expenses within a month. Only pairs with at least one transaction are present.
pub fn group_by_month_and_type(
    rows: &[Transaction],
) -> BTreeMap<(YearMonth, TransactionType), f64> {
    let mut totals = BTreeMap::new();

    for transaction in rows {
        let key = (YearMonth::from(transaction.date), transaction.type_);
        *totals.entry(key).or_insert(0.0) += transaction.amount;
    }

    totals
}

/// Sum amounts per category, largest total first (ties broken by name).
pub fn group_by_category(rows: &[Transaction]) -> Vec<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in rows {
        *totals.entry(transaction.category.as_str()).or_insert(0.0) += transaction.amount;
    }

    let mut totals: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(category, total)| (category.to_owned(), total))
        .collect();
    totals.sort_by(|(a_name, a_total), (b_name, b_total)| {
        b_total.total_cmp(a_total).then_with(|| a_name.cmp(b_name))
    });

    totals
}

/// [group_by_category] restricted to expenses.
pub fn expense_by_category(rows: &[Transaction]) -> Vec<(String, f64)> {
    let expenses: Vec<Transaction> = rows
        .iter()
        .filter(|transaction| transaction.type_ == TransactionType::Expense)
        .cloned()
        .collect();

    group_by_category(&expenses)
}
