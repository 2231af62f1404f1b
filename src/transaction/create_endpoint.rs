//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::html;

use crate::{
    alert::Alert,
    html::format_currency,
    session::{SessionId, with_store_mut},
    timezone::local_today,
    transaction::{
        create_page::{CreateTransactionState, new_transaction_form},
        form::TransactionForm,
    },
};

/// A route handler for creating a new transaction.
///
/// Responds with a fresh add transaction form and a success alert, or an
/// error alert if the transaction was not added.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(session_id): Extension<SessionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let fields = match form.into_fields() {
        Ok(fields) => fields,
        Err(error) => {
            tracing::warn!("Rejected new transaction: {error}");
            return error.into_alert_response();
        }
    };

    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let result = with_store_mut(&state.sessions, session_id, |store| {
        let transaction = store.append(fields);
        (transaction, store.categories())
    });

    let (transaction, known_categories) = match result {
        Ok(result) => result,
        Err(error) => return error.into_alert_response(),
    };

    tracing::info!(
        "Added transaction {} to session {session_id}",
        transaction.id
    );

    let alert = Alert::Success {
        message: "Transaction added".to_owned(),
        details: format!(
            "{} of {} in {}.",
            transaction.type_,
            format_currency(transaction.amount),
            transaction.category
        ),
    };

    html! {
        (new_transaction_form(today, &known_categories))
        (alert.into_oob_html())
    }
    .into_response()
}
