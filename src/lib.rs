//! Pennywise is a web app for keeping track of your income and expenses.
//!
//! Every visitor gets their own session with an in-memory list of
//! transactions. Nothing is written to disk: ending the session, going idle
//! or restarting the server discards the session's transactions.
//!
//! This library provides a web server that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod alert;
mod analytics;
mod app_state;
mod dashboard;
mod endpoints;
mod filter;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod session;
mod stylesheet;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use session::DEFAULT_IDLE_TIMEOUT;
pub use stylesheet::Stylesheet;

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The stylesheet could not be read at startup.
    ///
    /// Callers should pass in the path and the original error as a string.
    #[error("could not read the stylesheet: {0}")]
    StylesheetUnavailable(String),

    /// A negative amount was used to create or update a transaction.
    ///
    /// Whether money was earned or spent is recorded by the transaction type,
    /// so amounts are never negative.
    #[error("{0} is a negative amount, which is not allowed")]
    NegativeAmount(f64),

    /// The amount of a transaction was not a finite number.
    #[error("the amount must be a finite number")]
    InvalidAmount,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the session")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the session")]
    DeleteMissingTransaction,

    /// Could not acquire the session lock
    #[error("could not acquire the session lock")]
    SessionLockError,

    /// The session for the request has ended, e.g. it went idle while the request was in flight.
    #[error("the session could not be found")]
    SessionNotFound,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The transactions could not be written as CSV.
    #[error("could not export transactions as CSV: {0}")]
    CsvExportError(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::SessionNotFound => InternalServerError {
                description: "Your session has ended",
                fix: "Reload the page to start a new session.",
            }
            .into_response(),
            Error::SessionLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for an HTMX request.
    fn into_alert_response(self) -> Response {
        match self {
            Error::NegativeAmount(amount) => Alert::Error {
                message: "Invalid amount".to_owned(),
                details: format!(
                    "{amount} is negative. Enter the amount as a positive number and \
                    choose whether it is income or an expense."
                ),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidAmount => Alert::ErrorSimple {
                message: "The amount must be a number".to_owned(),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::UpdateMissingTransaction => Alert::Error {
                message: "Could not update transaction".to_owned(),
                details: "The transaction could not be found.".to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingTransaction => Alert::Error {
                message: "Could not delete transaction".to_owned(),
                details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::SessionNotFound => Alert::Error {
                message: "Your session has ended".to_owned(),
                details: "Reload the page to start a new session.".to_owned(),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            _ => Alert::Error {
                message: "Something went wrong".to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{
        Error,
        test_utils::{assert_valid_html, parse_html_document, parse_html_fragment},
    };

    #[tokio::test]
    async fn not_found_renders_404_page() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_valid_html(&parse_html_document(response).await);
    }

    #[tokio::test]
    async fn other_errors_render_500_page() {
        for error in [
            Error::SessionLockError,
            Error::SessionNotFound,
            Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()),
            Error::CsvExportError("disk on fire".to_owned()),
        ] {
            let response = error.into_response();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn alert_status_codes() {
        let cases = [
            (Error::NegativeAmount(-1.0), StatusCode::BAD_REQUEST),
            (Error::InvalidAmount, StatusCode::BAD_REQUEST),
            (Error::UpdateMissingTransaction, StatusCode::NOT_FOUND),
            (Error::DeleteMissingTransaction, StatusCode::NOT_FOUND),
            (Error::SessionLockError, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, want_status) in cases {
            let response = error.into_alert_response();

            assert_eq!(response.status(), want_status);
            assert_valid_html(&parse_html_fragment(response).await);
        }
    }
}
