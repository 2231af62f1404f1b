//! Defines the core data models for transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

/// Alias for the integer type used to identify transactions within a store.
pub type TransactionId = i64;

/// The category assigned to a transaction when the user leaves it blank.
pub const DEFAULT_CATEGORY: &str = "General";

/// Whether money was earned or spent.
///
/// The declaration order doubles as the display order: income is always
/// listed before expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in, e.g. a salary.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// Both transaction types in display order.
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    /// The value used for this type in forms and query strings.
    pub fn as_form_value(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "Income"),
            TransactionType::Expense => write!(f, "Expense"),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the store when it is appended.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// A free-text label, e.g. "Groceries".
    pub category: String,
    /// Whether the money was earned or spent.
    pub type_: TransactionType,
    /// The amount of money spent or earned, always zero or more.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
}

/// The user-editable fields of a [Transaction].
///
/// Use [TransactionFields::new] to get a value that upholds the amount and
/// category invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFields {
    pub date: Date,
    pub category: String,
    pub type_: TransactionType,
    pub amount: f64,
    pub description: String,
}

impl TransactionFields {
    /// Validate and normalise the fields for a transaction.
    ///
    /// A blank `category` is replaced with [DEFAULT_CATEGORY].
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::NegativeAmount] if `amount` is less than zero,
    /// - [Error::InvalidAmount] if `amount` is NaN or infinite.
    pub fn new(
        date: Date,
        category: &str,
        type_: TransactionType,
        amount: f64,
        description: &str,
    ) -> Result<Self, Error> {
        if !amount.is_finite() {
            return Err(Error::InvalidAmount);
        }

        if amount < 0.0 {
            return Err(Error::NegativeAmount(amount));
        }

        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            category => category,
        };

        Ok(Self {
            date,
            category: category.to_owned(),
            type_,
            // Avoids "-0.00" showing up in tables and exports.
            amount: amount.abs(),
            description: description.to_owned(),
        })
    }

    pub(crate) fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            category: self.category,
            type_: self.type_,
            amount: self.amount,
            description: self.description,
        }
    }
}

/// Sort `transactions` newest first.
///
/// Transactions on the same day keep the newest insertion first, so a freshly
/// added transaction shows up at the top of its day.
pub fn sort_by_date_descending(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}
