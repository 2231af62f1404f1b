//! Application router configuration with session-scoped and session-free route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};

use crate::{
    AppState,
    analytics::get_analytics_page,
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    session::{get_end_session, session_guard},
    stylesheet::get_stylesheet,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_create_transaction_page, get_export_transactions, get_manage_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let session_free_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::END_SESSION, get(get_end_session))
        .route(endpoints::STYLESHEET, get(get_stylesheet))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let session_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(endpoints::ANALYTICS_VIEW, get(get_analytics_page))
        .route(
            endpoints::MANAGE_TRANSACTIONS_VIEW,
            get(get_manage_transactions_page),
        )
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::EXPORT_TRANSACTIONS,
            get(get_export_transactions),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), session_guard));

    session_routes
        .merge(session_free_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
