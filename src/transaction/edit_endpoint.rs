use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::html;

use crate::{
    alert::Alert,
    session::{SessionId, with_store_mut},
    transaction::{
        TransactionId,
        form::TransactionForm,
        manage_page::{ManageTransactionsState, manage_content},
    },
};

/// Overwrite the fields of the transaction `transaction_id`.
///
/// Responds with the re-rendered transaction list (without the edit form) and
/// a success alert.
pub async fn edit_transaction_endpoint(
    State(state): State<ManageTransactionsState>,
    Extension(session_id): Extension<SessionId>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let fields = match form.into_fields() {
        Ok(fields) => fields,
        Err(error) => {
            tracing::warn!("Rejected update to transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    let result = with_store_mut(&state.sessions, session_id, |store| {
        store
            .update_by_id(transaction_id, fields)
            .map(|_| manage_content(store, None))
    })
    .and_then(|result| result);

    match result {
        Ok(content) => {
            tracing::info!("Updated transaction {transaction_id} in session {session_id}");

            html! {
                (content)
                (Alert::SuccessSimple { message: "Transaction updated".to_owned() }.into_oob_html())
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
