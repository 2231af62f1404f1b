//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for the filter panel and the dashboard layout
//! - The state used by the handler

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use axum::{
    Extension,
    extract::{FromRef, RawQuery, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState, Error,
    aggregation::summarize,
    dashboard::{
        cards::metric_cards,
        query::{DashboardQuery, displayed_transactions},
        tables::transactions_table,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, link,
    },
    navigation::NavBar,
    session::{SessionId, SessionRegistry, with_store},
    timezone::local_today,
    transaction::{Transaction, TransactionType},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Every live session and its transactions.
    pub sessions: Arc<Mutex<SessionRegistry>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sessions: state.sessions.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    known_categories: Vec<String>,
    transactions: Vec<Transaction>,
}

/// Display the totals and transactions of the session, optionally filtered.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(session_id): Extension<SessionId>,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);
    let today = local_today(&state.local_timezone)?;

    let data = with_store(&state.sessions, session_id, |store| {
        if store.is_empty() {
            return None;
        }

        Some(DashboardData {
            known_categories: store.categories(),
            transactions: displayed_transactions(&store.read_all(), &query, today),
        })
    })?;

    match data {
        Some(data) => {
            let export_url = match raw_query.as_deref() {
                Some(raw_query) if !raw_query.is_empty() => {
                    format!("{}?{raw_query}", endpoints::EXPORT_TRANSACTIONS)
                }
                _ => endpoints::EXPORT_TRANSACTIONS.to_owned(),
            };

            Ok(dashboard_view(nav_bar, &query, today, &data, &export_url).into_response())
        }
        None => Ok(dashboard_no_data_view(nav_bar).into_response()),
    }
}

/// Renders the dashboard page when the session has no transactions.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "Add a transaction");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p id="empty-message"
            {
                "No transactions recorded yet. "
                (new_transaction_link) " to see your totals here."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(
    nav_bar: NavBar,
    query: &DashboardQuery,
    today: Date,
    data: &DashboardData,
    export_url: &str,
) -> Markup {
    let nav_bar = nav_bar.into_html();
    let summary = summarize(&data.transactions);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center gap-4 px-2 lg:px-6 py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold self-start" { "Dashboard" }

            (filter_panel(query, today, &data.known_categories))

            (metric_cards(&summary))

            div class="flex w-full justify-end"
            {
                a
                    id="download-csv"
                    href=(export_url)
                    download="transactions.csv"
                    class=(LINK_STYLE)
                {
                    "Download CSV"
                }
            }

            (transactions_table(&data.transactions))
        }
    );

    base("Dashboard", &[], &content)
}

/// A collapsible GET form for narrowing the dashboard by date, type and category.
///
/// The hidden `apply` input marks a submitted filter, so a plain visit to the
/// dashboard shows every transaction.
fn filter_panel(query: &DashboardQuery, today: Date, known_categories: &[String]) -> Markup {
    let (start, end) = query.date_range(today);
    let checked_categories: HashSet<String> = query.checked_categories(known_categories);

    html! {
        details
            id="filter-panel"
            open[query.apply]
            class="w-full bg-gray-50 dark:bg-gray-800 p-4 rounded-lg shadow"
        {
            summary class="cursor-pointer font-semibold" { "Filters" }

            form
                method="get"
                action=(endpoints::DASHBOARD_VIEW)
                class="mt-4 space-y-4"
            {
                input type="hidden" name="apply" value="true";

                div class="grid grid-cols-1 sm:grid-cols-2 gap-4"
                {
                    div
                    {
                        label for="start" class=(FORM_LABEL_STYLE) { "Start date" }
                        input
                            type="date"
                            name="start"
                            id="start"
                            value=(start)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="end" class=(FORM_LABEL_STYLE) { "End date" }
                        input
                            type="date"
                            name="end"
                            id="end"
                            value=(end)
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                fieldset
                {
                    legend class=(FORM_LABEL_STYLE) { "Transaction types" }

                    div class="flex gap-4"
                    {
                        @for type_ in TransactionType::ALL {
                            label class="flex items-center space-x-2"
                            {
                                input
                                    type="checkbox"
                                    name="type"
                                    value=(type_.as_form_value())
                                    checked[query.is_type_checked(type_)]
                                    class=(FORM_CHECKBOX_STYLE);

                                span { (type_) }
                            }
                        }
                    }
                }

                fieldset
                {
                    legend class=(FORM_LABEL_STYLE) { "Categories" }

                    div class="grid grid-cols-2 md:grid-cols-3 lg:grid-cols-4 gap-3"
                    {
                        @for category in known_categories {
                            label class="flex items-center space-x-2"
                            {
                                input
                                    type="checkbox"
                                    name="category"
                                    value=(category)
                                    checked[checked_categories.contains(category)]
                                    class=(FORM_CHECKBOX_STYLE);

                                span class=(CATEGORY_BADGE_STYLE) { (category) }
                            }
                        }
                    }
                }

                div class="flex items-center gap-4"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply filters" }

                    a href=(endpoints::DASHBOARD_VIEW) class={"whitespace-nowrap " (LINK_STYLE)}
                    {
                        "Clear"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{RawQuery, State},
    };
    use axum_extra::extract::Query;
    use scraper::{Html, Selector};
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::{
        dashboard::query::DashboardQuery,
        session::{SessionId, SessionRegistry},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        transaction::{TransactionFields, TransactionType},
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_state(rows: &[(time::Date, &str, TransactionType, f64)]) -> (DashboardState, SessionId) {
        let mut registry = SessionRegistry::default();
        let session_id = registry.create(OffsetDateTime::now_utc());
        let store = registry.store_mut(session_id).unwrap();
        for (date, category, type_, amount) in rows {
            store.append(TransactionFields::new(*date, category, *type_, *amount, "").unwrap());
        }

        (
            DashboardState {
                sessions: Arc::new(Mutex::new(registry)),
                local_timezone: "Etc/UTC".to_owned(),
            },
            session_id,
        )
    }

    async fn render(state: DashboardState, session_id: SessionId, raw_query: &str) -> Html {
        let query: DashboardQuery = serde_html_form::from_str(raw_query).unwrap();
        let response = get_dashboard_page(
            State(state),
            Extension(session_id),
            RawQuery(Some(raw_query.to_owned())),
            Query(query),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        html
    }

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("No element matching {selector}"))
            .text()
            .collect::<String>()
    }

    fn checked_values(html: &Html, name: &str) -> Vec<String> {
        html.select(&Selector::parse(&format!("input[type=checkbox][name={name}]")).unwrap())
            .filter(|input| input.value().attr("checked").is_some())
            .filter_map(|input| input.value().attr("value"))
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn empty_store_shows_message_only() {
        let (state, session_id) = get_state(&[]);

        let html = render(state, session_id, "").await;

        assert!(text_of(&html, "#empty-message").contains("No transactions recorded yet."));
        for selector in ["#metrics", "#filter-panel", "table"] {
            assert!(
                html.select(&Selector::parse(selector).unwrap()).next().is_none(),
                "want no {selector} for an empty store"
            );
        }
    }

    #[tokio::test]
    async fn unfiltered_dashboard_shows_every_transaction() {
        let (state, session_id) = get_state(&[
            (date!(2020 - 01 - 01), "Food", TransactionType::Expense, 42.5),
            (date!(2020 - 01 - 02), "Salary", TransactionType::Income, 2000.0),
        ]);

        let html = render(state, session_id, "").await;

        assert_eq!(text_of(&html, "#total-income"), "$2,000.00");
        assert_eq!(text_of(&html, "#total-expense"), "$42.50");
        assert_eq!(text_of(&html, "#balance"), "$1,957.50");
        assert_eq!(
            html.select(&Selector::parse("tbody tr").unwrap()).count(),
            2
        );
    }

    #[tokio::test]
    async fn filter_panel_defaults() {
        let (state, session_id) = get_state(&[
            (date!(2020 - 01 - 01), "Food", TransactionType::Expense, 1.0),
            (date!(2020 - 01 - 02), "Rent", TransactionType::Expense, 1.0),
        ]);
        let today = OffsetDateTime::now_utc().date();

        let html = render(state, session_id, "").await;

        let value_of = |id: &str| {
            html.select(&Selector::parse(&format!("input#{id}")).unwrap())
                .next()
                .and_then(|input| input.value().attr("value"))
                .map(str::to_owned)
        };
        assert_eq!(value_of("start"), Some((today - Duration::days(30)).to_string()));
        assert_eq!(value_of("end"), Some(today.to_string()));
        assert_eq!(checked_values(&html, "type"), ["income", "expense"]);
        assert_eq!(checked_values(&html, "category"), ["Food", "Rent"]);
    }

    #[tokio::test]
    async fn applied_filter_narrows_totals_and_table() {
        let (state, session_id) = get_state(&[
            (date!(2024 - 01 - 10), "Food", TransactionType::Expense, 42.5),
            (date!(2024 - 01 - 12), "Rent", TransactionType::Expense, 900.0),
            (date!(2024 - 01 - 15), "Salary", TransactionType::Income, 2000.0),
            (date!(2023 - 12 - 31), "Food", TransactionType::Expense, 10.0),
        ]);

        let html = render(
            state,
            session_id,
            "apply=true&start=2024-01-01&end=2024-01-31&type=expense&category=Food&category=Salary",
        )
        .await;

        assert_eq!(text_of(&html, "#total-income"), "$0.00");
        assert_eq!(text_of(&html, "#total-expense"), "$42.50");
        assert_eq!(text_of(&html, "#balance"), "-$42.50");
        assert_eq!(
            html.select(&Selector::parse("tbody tr").unwrap()).count(),
            1
        );
        assert_eq!(checked_values(&html, "type"), ["expense"]);
        assert_eq!(checked_values(&html, "category"), ["Food", "Salary"]);
    }

    #[tokio::test]
    async fn download_link_keeps_query_string() {
        let (state, session_id) = get_state(&[(
            date!(2024 - 01 - 10),
            "Food",
            TransactionType::Expense,
            42.5,
        )]);

        let html = render(state, session_id, "apply=true&type=expense&category=Food").await;

        let href = html
            .select(&Selector::parse("a#download-csv").unwrap())
            .next()
            .and_then(|link| link.value().attr("href"))
            .map(str::to_owned);
        assert_eq!(
            href.as_deref(),
            Some("/api/transactions/export?apply=true&type=expense&category=Food")
        );
    }

    #[tokio::test]
    async fn filter_with_no_matches_shows_message() {
        let (state, session_id) = get_state(&[(
            date!(2024 - 01 - 10),
            "Food",
            TransactionType::Expense,
            42.5,
        )]);

        let html = render(
            state,
            session_id,
            "apply=true&start=2024-01-01&end=2024-01-31&type=income&type=expense",
        )
        .await;

        assert_eq!(text_of(&html, "#balance"), "$0.00");
        assert!(html.select(&Selector::parse("#no-matches").unwrap()).next().is_some());
    }
}
