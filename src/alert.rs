//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element of the base page,
//! either as the target of a failed HTMX request (`hx-target-error`) or as an
//! out-of-band swap alongside a successful response.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// A dismissable message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    SuccessSimple { message: String },
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    fn is_error(&self) -> bool {
        matches!(self, Alert::Error { .. } | Alert::ErrorSimple { .. })
    }

    fn message(&self) -> &str {
        match self {
            Alert::Success { message, .. }
            | Alert::SuccessSimple { message }
            | Alert::Error { message, .. }
            | Alert::ErrorSimple { message } => message,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            Alert::Success { details, .. } | Alert::Error { details, .. }
                if !details.is_empty() =>
            {
                Some(details)
            }
            _ => None,
        }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/alerts/
        let style = if self.is_error() {
            "flex items-start p-4 mb-4 text-red-800 border border-red-300 rounded-lg \
            bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start p-4 mb-4 text-green-800 border border-green-300 rounded-lg \
            bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        html! {
            div role="alert" class=(style)
            {
                div class="ms-1 text-sm"
                {
                    p class="font-medium" { (self.message()) }

                    @if let Some(details) = self.details() {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8 hover:opacity-75"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "✕"
                }
            }
        }
    }

    /// Render the alert so that HTMX swaps it into the alert container
    /// regardless of the request's target.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML" { (self.into_html()) }
        }
    }

    /// Render the alert as a response with the status code `status`.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Html(self.into_html().into_string())).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        let status = if self.is_error() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        };

        self.into_response_with_status(status)
    }
}
