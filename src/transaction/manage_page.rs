//! The page for reviewing, editing and deleting transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CATEGORY_BADGE_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, dollar_input_styles, format_currency, link, truncate_description,
    },
    navigation::NavBar,
    session::{SessionId, SessionRegistry, with_store},
    transaction::{
        Transaction, TransactionId, TransactionStore, TransactionType,
        form::{TransactionFormDefaults, transaction_form_fields},
        sort_by_date_descending,
    },
};

/// The state needed to manage transactions.
#[derive(Debug, Clone)]
pub struct ManageTransactionsState {
    /// Every live session and its transactions.
    pub sessions: Arc<Mutex<SessionRegistry>>,
}

impl FromRef<AppState> for ManageTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sessions: state.sessions.clone(),
        }
    }
}

/// The query parameters for the manage transactions page.
#[derive(Debug, Default, Deserialize)]
pub struct ManageQuery {
    /// The ID of the transaction to show the edit form for.
    pub edit: Option<TransactionId>,
}

/// Render the page listing every transaction in the session.
///
/// With `?edit={id}` an edit form for that transaction is shown below the list.
pub async fn get_manage_transactions_page(
    State(state): State<ManageTransactionsState>,
    Extension(session_id): Extension<SessionId>,
    Query(query): Query<ManageQuery>,
) -> Result<Response, Error> {
    let content = with_store(&state.sessions, session_id, |store| {
        manage_content(store, query.edit)
    })?;

    let nav_bar = NavBar::new(endpoints::MANAGE_TRANSACTIONS_VIEW).into_html();
    let page = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-4"
            {
                h2 class="text-xl font-bold" { "Manage Transactions" }

                (content)
            }
        }
    };

    Ok(base("Manage Transactions", &[dollar_input_styles()], &page).into_response())
}

/// The transaction list, plus the edit form for `editing` if that transaction exists.
///
/// The edit and delete endpoints respond with this markup, which replaces the
/// element with the ID `manage-content`.
pub(crate) fn manage_content(store: &TransactionStore, editing: Option<TransactionId>) -> Markup {
    if store.is_empty() {
        return html! {
            div id="manage-content"
            {
                p
                {
                    "No transactions yet. "
                    (link(endpoints::NEW_TRANSACTION_VIEW, "Add a transaction"))
                    " to get started."
                }
            }
        };
    }

    let mut transactions = store.read_all();
    sort_by_date_descending(&mut transactions);

    let editing = editing.and_then(|id| {
        let transaction = store.get(id);

        if transaction.is_none() {
            tracing::warn!("Cannot edit transaction {id}: it does not exist");
        }

        transaction
    });
    let known_categories = store.categories();

    html! {
        div id="manage-content" class="space-y-6"
        {
            (transactions_table(&transactions))

            @if let Some(transaction) = editing {
                (edit_transaction_form(transaction, &known_categories))
            }
        }
    }
}

fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md rounded"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
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
                        th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let (description, tooltip) = truncate_description(&transaction.description);
    let edit_url = format!(
        "{}?edit={}",
        endpoints::MANAGE_TRANSACTIONS_VIEW,
        transaction.id
    );
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let amount_style = match transaction.type_ {
        TransactionType::Income => "px-6 py-4 text-right text-green-700 dark:text-green-400",
        TransactionType::Expense => "px-6 py-4 text-right",
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.type_) }
            td class=(amount_style) { (format_currency(transaction.amount)) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class="px-6 py-4 flex gap-4 justify-end"
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                button
                    type="button"
                    hx-delete=(delete_url)
                    hx-target="#manage-content"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    hx-replace-url=(endpoints::MANAGE_TRANSACTIONS_VIEW)
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn edit_transaction_form(transaction: &Transaction, known_categories: &[String]) -> Markup {
    let defaults = TransactionFormDefaults {
        transaction_type: transaction.type_,
        amount: Some(transaction.amount),
        date: transaction.date,
        category: &transaction.category,
        description: Some(&transaction.description),
        autofocus_amount: true,
    };

    html! {
        div class="w-full max-w-md mx-auto"
        {
            form
                id="edit-transaction-form"
                hx-put=(format_endpoint(endpoints::TRANSACTION, transaction.id))
                hx-target="#manage-content"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                hx-replace-url=(endpoints::MANAGE_TRANSACTIONS_VIEW)
                class="w-full space-y-4 md:space-y-6"
            {
                h3 class="text-lg font-bold" { "Edit Transaction" }

                (transaction_form_fields(&defaults, known_categories))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }

                a
                    href=(endpoints::MANAGE_TRANSACTIONS_VIEW)
                    class=(BUTTON_SECONDARY_STYLE)
                    role="button"
                {
                    "Cancel"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use axum_extra::extract::Query;
    use scraper::{Html, Selector};
    use time::{OffsetDateTime, macros::date};

    use crate::{
        endpoints::{self, format_endpoint},
        session::{SessionId, SessionRegistry},
        test_utils::{
            assert_hx_endpoint, assert_status_ok, assert_valid_html, parse_html_document,
        },
        transaction::{TransactionFields, TransactionType},
    };

    use super::{ManageQuery, ManageTransactionsState, get_manage_transactions_page};

    fn get_state(rows: &[(time::Date, &str, f64)]) -> (ManageTransactionsState, SessionId) {
        let mut registry = SessionRegistry::default();
        let session_id = registry.create(OffsetDateTime::now_utc());
        let store = registry.store_mut(session_id).unwrap();

        for (date, category, amount) in rows {
            store.append(
                TransactionFields::new(*date, category, TransactionType::Expense, *amount, "")
                    .unwrap(),
            );
        }

        (
            ManageTransactionsState {
                sessions: Arc::new(Mutex::new(registry)),
            },
            session_id,
        )
    }

    async fn render(state: ManageTransactionsState, session_id: SessionId, edit: Option<i64>) -> Html {
        let response =
            get_manage_transactions_page(State(state), Extension(session_id), Query(ManageQuery { edit }))
                .await
                .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        html
    }

    fn row_ids(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("tbody tr").unwrap())
            .filter_map(|row| row.value().attr("data-transaction-id"))
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn empty_store_shows_message() {
        let (state, session_id) = get_state(&[]);

        let html = render(state, session_id, None).await;

        assert!(html.select(&Selector::parse("table").unwrap()).next().is_none());
        let content = html
            .select(&Selector::parse("#manage-content").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert!(content.contains("No transactions yet."));
    }

    #[tokio::test]
    async fn lists_transactions_newest_first() {
        let (state, session_id) = get_state(&[
            (date!(2024 - 01 - 05), "Food", 1.0),
            (date!(2024 - 03 - 01), "Rent", 2.0),
            (date!(2024 - 02 - 10), "Fuel", 3.0),
        ]);

        let html = render(state, session_id, None).await;

        assert_eq!(row_ids(&html), ["1", "2", "0"]);
        assert!(
            html.select(&Selector::parse("#edit-transaction-form").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn rows_have_edit_and_delete_controls() {
        let (state, session_id) = get_state(&[(date!(2024 - 01 - 05), "Food", 1.0)]);

        let html = render(state, session_id, None).await;

        let edit_link = html
            .select(&Selector::parse("tbody a").unwrap())
            .next()
            .expect("No edit link found");
        assert_eq!(edit_link.value().attr("href"), Some("/transactions?edit=0"));

        let delete_button = html
            .select(&Selector::parse("tbody button").unwrap())
            .next()
            .expect("No delete button found");
        assert_hx_endpoint(
            &delete_button,
            &format_endpoint(endpoints::TRANSACTION, 0),
            "hx-delete",
        );
        assert_eq!(
            delete_button.value().attr("hx-confirm"),
            None,
            "deleting should happen as soon as the button is clicked"
        );
    }

    #[tokio::test]
    async fn edit_query_shows_prefilled_form() {
        let (state, session_id) = get_state(&[
            (date!(2024 - 01 - 05), "Food", 1.0),
            (date!(2024 - 02 - 10), "Fuel", 3.5),
        ]);

        let html = render(state, session_id, Some(1)).await;

        let form = html
            .select(&Selector::parse("#edit-transaction-form").unwrap())
            .next()
            .expect("No edit form found");
        assert_hx_endpoint(&form, &format_endpoint(endpoints::TRANSACTION, 1), "hx-put");
        let amount = form
            .select(&Selector::parse("input[name=amount]").unwrap())
            .next()
            .unwrap();
        assert_eq!(amount.value().attr("value"), Some("3.50"));
        let category = form
            .select(&Selector::parse("input[name=category]").unwrap())
            .next()
            .unwrap();
        assert_eq!(category.value().attr("value"), Some("Fuel"));
    }

    #[tokio::test]
    async fn unknown_edit_id_shows_list_only() {
        let (state, session_id) = get_state(&[(date!(2024 - 01 - 05), "Food", 1.0)]);

        let html = render(state, session_id, Some(42)).await;

        assert_eq!(row_ids(&html), ["0"]);
        assert!(
            html.select(&Selector::parse("#edit-transaction-form").unwrap())
                .next()
                .is_none()
        );
    }
}
