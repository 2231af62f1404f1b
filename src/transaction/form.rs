//! The form fields shared by the add and edit transaction forms.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::{DEFAULT_CATEGORY, TransactionFields, TransactionType},
};

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The date when the transaction occurred.
    pub date: Date,
    /// Whether the transaction is income or an expense.
    pub type_: TransactionType,
    /// A free-text label, blank means [DEFAULT_CATEGORY].
    #[serde(default)]
    pub category: String,
    /// The value of the transaction in dollars. Left empty means zero.
    #[serde(default)]
    pub amount: Option<f64>,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: String,
}

impl TransactionForm {
    /// Validate the submitted values.
    ///
    /// # Errors
    /// Returns an [Error::NegativeAmount] or [Error::InvalidAmount] if the amount is not allowed.
    pub fn into_fields(self) -> Result<TransactionFields, Error> {
        TransactionFields::new(
            self.date,
            &self.category,
            self.type_,
            self.amount.unwrap_or(0.0),
            &self.description,
        )
    }
}

pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub amount: Option<f64>,
    pub date: Date,
    pub category: &'a str,
    pub description: Option<&'a str>,
    pub autofocus_amount: bool,
}

impl TransactionFormDefaults<'_> {
    /// The defaults for a brand new transaction dated `today`.
    pub fn new_transaction(today: Date) -> Self {
        Self {
            transaction_type: TransactionType::Income,
            amount: None,
            date: today,
            category: DEFAULT_CATEGORY,
            description: None,
            autofocus_amount: true,
        }
    }
}

/// The type, amount, date, category and description inputs.
///
/// `known_categories` are offered as suggestions for the category input.
pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    known_categories: &[String],
) -> Markup {
    let is_expense = matches!(defaults.transaction_type, TransactionType::Expense);
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="type_"
                        id="transaction-type-income"
                        type="radio"
                        value=(TransactionType::Income.as_form_value())
                        checked[!is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Income"
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="type_"
                        id="transaction-type-expense"
                        type="radio"
                        value=(TransactionType::Expense.as_form_value())
                        checked[is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        "Expense"
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    value=[amount_str.as_deref()]
                    autofocus[defaults.autofocus_amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                name="category"
                id="category"
                type="text"
                list="category-suggestions"
                placeholder=(DEFAULT_CATEGORY)
                value=(defaults.category)
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id="category-suggestions"
            {
                @for category in known_categories {
                    option value=(category) {}
                }
            }
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            textarea
                name="description"
                id="description"
                rows="3"
                placeholder="Description"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                (defaults.description.unwrap_or_default())
            }
        }
    }
}
