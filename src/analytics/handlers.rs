//! The analytics page: charts of income and expenses over time and by category.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    aggregation::{expense_by_category, group_by_month_and_type},
    analytics::charts::{
        AnalyticsChart, ECHARTS_URL, charts_script, expense_distribution_chart,
        monthly_income_expense_chart, monthly_series,
    },
    endpoints,
    html::{
        HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, link,
    },
    navigation::NavBar,
    session::{SessionId, SessionRegistry, with_store},
    transaction::Transaction,
};

const CHART_CONTAINER_STYLE: &str = "min-h-[380px] w-full rounded dark:bg-gray-100";

/// The state needed for the analytics page.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// Every live session and its transactions.
    pub sessions: Arc<Mutex<SessionRegistry>>,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sessions: state.sessions.clone(),
        }
    }
}

/// Display charts for every transaction in the session.
pub async fn get_analytics_page(
    State(state): State<AnalyticsState>,
    Extension(session_id): Extension<SessionId>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::ANALYTICS_VIEW);
    let transactions = with_store(&state.sessions, session_id, |store| store.read_all())?;

    if transactions.is_empty() {
        return Ok(analytics_no_data_view(nav_bar).into_response());
    }

    Ok(analytics_view(nav_bar, &transactions).into_response())
}

fn analytics_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "Add a transaction");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p id="empty-message"
            {
                "Charts will show up here once you add some transactions. "
                (new_transaction_link) " to get started."
            }
        }
    );

    base("Analytics", &[], &content)
}

fn analytics_view(nav_bar: NavBar, transactions: &[Transaction]) -> Markup {
    let nav_bar = nav_bar.into_html();
    let monthly_totals = group_by_month_and_type(transactions);
    let category_totals = expense_by_category(transactions);

    let mut charts = vec![AnalyticsChart {
        id: "monthly-chart",
        options: monthly_income_expense_chart(&monthly_totals).to_string(),
    }];

    if !category_totals.is_empty() {
        charts.push(AnalyticsChart {
            id: "category-chart",
            options: expense_distribution_chart(&category_totals).to_string(),
        });
    }

    let (months, income, expense) = monthly_series(&monthly_totals);
    let total_expense: f64 = category_totals.iter().map(|(_, total)| total).sum();

    let content = html!(
        (nav_bar)

        div
            id="analytics-content"
            class="flex flex-col items-center gap-8 px-2 lg:px-6 py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold self-start" { "Analytics" }

            section id="monthly" class="w-full space-y-4"
            {
                div id="monthly-chart" class=(CHART_CONTAINER_STYLE) {}

                (monthly_table(&months, &income, &expense))
            }

            @if !category_totals.is_empty() {
                section id="categories" class="w-full space-y-4"
                {
                    div id="category-chart" class=(CHART_CONTAINER_STYLE) {}

                    (category_table(&category_totals, total_expense))
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Analytics", &scripts, &content)
}

fn monthly_table(months: &[String], income: &[f64], expense: &[f64]) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table
                id="monthly-table"
                class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                caption class="sr-only" { "Monthly income and expense" }

                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                        th scope="col" class="px-6 py-4 text-right" { "Income" }
                        th scope="col" class="px-6 py-4 text-right" { "Expense" }
                    }
                }

                tbody
                {
                    @for ((month, income), expense) in months.iter().zip(income).zip(expense) {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { (month) }
                            td class="px-6 py-4 text-right" { (format_currency(*income)) }
                            td class="px-6 py-4 text-right" { (format_currency(*expense)) }
                        }
                    }
                }
            }
        }
    }
}

/// `amount` as a percentage of `total` with one decimal place, e.g. "12.5%".
fn format_share(amount: f64, total: f64) -> String {
    let share = if total > 0.0 {
        amount / total * 100.0
    } else {
        0.0
    };

    format!("{share:.1}%")
}

fn category_table(category_totals: &[(String, f64)], total_expense: f64) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table
                id="category-table"
                class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                caption class="sr-only" { "Expenses by category" }

                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class="px-6 py-4 text-right" { "Share" }
                    }
                }

                tbody
                {
                    @for (category, total) in category_totals {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { (category) }
                            td class="px-6 py-4 text-right" { (format_currency(*total)) }
                            td class="px-6 py-4 text-right" { (format_share(*total, total_expense)) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use scraper::{Html, Selector};
    use time::{OffsetDateTime, macros::date};

    use crate::{
        session::{SessionId, SessionRegistry},
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        transaction::{TransactionFields, TransactionType},
    };

    use super::{AnalyticsState, get_analytics_page};

    fn get_state(rows: &[(time::Date, &str, TransactionType, f64)]) -> (AnalyticsState, SessionId) {
        let mut registry = SessionRegistry::default();
        let session_id = registry.create(OffsetDateTime::now_utc());
        let store = registry.store_mut(session_id).unwrap();
        for (date, category, type_, amount) in rows {
            store.append(TransactionFields::new(*date, category, *type_, *amount, "").unwrap());
        }

        (
            AnalyticsState {
                sessions: Arc::new(Mutex::new(registry)),
            },
            session_id,
        )
    }

    async fn render(state: AnalyticsState, session_id: SessionId) -> Html {
        let response = get_analytics_page(State(state), Extension(session_id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        html
    }

    fn exists(html: &Html, selector: &str) -> bool {
        html.select(&Selector::parse(selector).unwrap()).next().is_some()
    }

    fn table_rows(html: &Html, table_id: &str) -> Vec<Vec<String>> {
        html.select(&Selector::parse(&format!("#{table_id} tbody tr")).unwrap())
            .map(|row| {
                row.select(&Selector::parse("th, td").unwrap())
                    .map(|cell| cell.text().collect::<String>())
                    .collect()
            })
            .collect()
    }

    #[tokio::test]
    async fn empty_store_shows_message() {
        let (state, session_id) = get_state(&[]);

        let html = render(state, session_id).await;

        assert!(exists(&html, "#empty-message"));
        assert!(!exists(&html, "#monthly-chart"));
        assert!(!exists(&html, "#category-chart"));
    }

    #[tokio::test]
    async fn shows_both_charts_with_tables() {
        let (state, session_id) = get_state(&[
            (date!(2024 - 03 - 20), "Food", TransactionType::Expense, 25.0),
            (date!(2024 - 01 - 15), "Salary", TransactionType::Income, 2000.0),
            (date!(2024 - 01 - 16), "Rent", TransactionType::Expense, 75.0),
        ]);

        let html = render(state, session_id).await;

        assert!(exists(&html, "#monthly-chart"));
        assert!(exists(&html, "#category-chart"));
        assert_eq!(
            table_rows(&html, "monthly-table"),
            [
                ["2024-01", "$2,000.00", "$75.00"],
                ["2024-03", "$0.00", "$25.00"],
            ]
        );
        assert_eq!(
            table_rows(&html, "category-table"),
            [["Rent", "$75.00", "75.0%"], ["Food", "$25.00", "25.0%"]]
        );
    }

    #[tokio::test]
    async fn income_only_has_no_pie_chart() {
        let (state, session_id) = get_state(&[(
            date!(2024 - 01 - 15),
            "Salary",
            TransactionType::Income,
            2000.0,
        )]);

        let html = render(state, session_id).await;

        assert!(exists(&html, "#monthly-chart"));
        assert!(!exists(&html, "#category-chart"));
        assert!(!exists(&html, "#category-table"));
    }
}
