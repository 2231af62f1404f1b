//! Defines the route handler for the page for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    session::{SessionId, SessionRegistry, with_store},
    timezone::local_today,
    transaction::form::{TransactionFormDefaults, transaction_form_fields},
};

/// The state needed for the new transaction page and the create transaction endpoint.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// Every live session and its transactions.
    pub sessions: Arc<Mutex<SessionRegistry>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            sessions: state.sessions.clone(),
        }
    }
}

/// The add transaction form with every input reset to its default.
///
/// The form replaces itself with the response of a successful submission,
/// so the create endpoint responds with this same form.
pub(crate) fn new_transaction_form(today: Date, known_categories: &[String]) -> Markup {
    let defaults = TransactionFormDefaults::new_transaction(today);
    let spinner = loading_spinner();

    html! {
        form
            id="new-transaction-form"
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            h2 class="text-xl font-bold" { "New Transaction" }

            (transaction_form_fields(&defaults, known_categories))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span
                    id="indicator"
                    class="inline htmx-indicator"
                {
                    (spinner)
                }
                " Add Transaction"
            }
        }
    }
}

fn create_transaction_view(today: Date, known_categories: &[String]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md"
            {
                (new_transaction_form(today, known_categories))
            }
        }
    };

    base("Add Transaction", &[dollar_input_styles()], &content)
}

/// Renders the page for creating a transaction.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Response, Error> {
    let known_categories = with_store(&state.sessions, session_id, |store| store.categories())?;
    let today = local_today(&state.local_timezone)?;

    Ok(create_transaction_view(today, &known_categories).into_response())
}
