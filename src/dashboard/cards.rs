//! Metric cards for the totals of the displayed transactions.

use maud::{Markup, html};

use crate::{aggregation::Summary, html::format_currency};

const CARD_STYLE: &str = "flex flex-col gap-1 p-4 rounded-lg shadow bg-white dark:bg-gray-800";
const CARD_LABEL_STYLE: &str = "text-sm font-medium text-gray-500 dark:text-gray-400";

fn balance_color_class(balance: f64) -> &'static str {
    if balance >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    }
}

fn metric_card(id: &str, label: &str, value: f64, value_class: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            span class=(CARD_LABEL_STYLE) { (label) }
            span id=(id) class={"text-2xl font-bold " (value_class)} { (format_currency(value)) }
        }
    }
}

/// Total income, total expense and balance side by side.
pub(super) fn metric_cards(summary: &Summary) -> Markup {
    html! {
        section id="metrics" class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full"
        {
            (metric_card("total-income", "Total Income", summary.income, "text-gray-900 dark:text-white"))
            (metric_card("total-expense", "Total Expense", summary.expense, "text-gray-900 dark:text-white"))
            (metric_card("balance", "Balance", summary.balance, balance_color_class(summary.balance)))
        }

        p class="text-sm text-gray-500 dark:text-gray-400"
        {
            @match summary.count {
                1 => { "1 transaction" }
                count => { (count) " transactions" }
            }
        }
    }
}
