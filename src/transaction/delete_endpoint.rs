use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    alert::Alert,
    session::{SessionId, with_store_mut},
    transaction::{
        TransactionId,
        manage_page::{ManageTransactionsState, manage_content},
    },
};

/// Remove the transaction `transaction_id` from the session.
///
/// Responds with the re-rendered transaction list and a success alert.
pub async fn delete_transaction_endpoint(
    State(state): State<ManageTransactionsState>,
    Extension(session_id): Extension<SessionId>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let result = with_store_mut(&state.sessions, session_id, |store| {
        store
            .delete_by_id(transaction_id)
            .map(|_| manage_content(store, None))
    })
    .and_then(|result| result);

    match result {
        Ok(content) => {
            tracing::info!("Deleted transaction {transaction_id} from session {session_id}");

            html! {
                (content)
                (Alert::SuccessSimple { message: "Transaction deleted".to_owned() }.into_oob_html())
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
