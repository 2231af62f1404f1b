//! The table of transactions shown on the dashboard.

use maud::{Markup, html};

use crate::{
    html::{
        CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency, truncate_description,
    },
    transaction::{Transaction, TransactionType},
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Renders `transactions` in the order given.
pub(super) fn transactions_table(transactions: &[Transaction]) -> Markup {
    if transactions.is_empty() {
        return html! {
            p id="no-matches" class="text-gray-600 dark:text-gray-400"
            {
                "No transactions match the selected filters."
            }
        };
    }

    html! {
        div class="relative overflow-x-auto shadow-md rounded w-full"
        {
            table
                id="transactions-table"
                class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        @let (description, tooltip) = truncate_description(&transaction.description);
                        @let (sign, color) = match transaction.type_ {
                            TransactionType::Income => ("", TABLE_CELL_GREEN_STYLE),
                            TransactionType::Expense => ("-", TABLE_CELL_RED_STYLE),
                        };

                        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.date) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.type_) }
                            td class={"px-6 py-4 text-right whitespace-nowrap " (color)}
                            {
                                (sign) (format_currency(transaction.amount))
                            }
                            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
                        }
                    }
                }
            }
        }
    }
}
