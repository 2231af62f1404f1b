//! Chart generation and rendering for the analytics page.
//!
//! This module creates interactive ECharts visualizations:
//! - **Monthly Income vs Expense**: Grouped bar chart with one series per transaction type
//! - **Expense Distribution by Category**: Pie chart of expenses per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use std::collections::BTreeMap;

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::PreEscaped;

use crate::{
    aggregation::YearMonth,
    html::HeadElement,
    transaction::TransactionType,
};

/// The ECharts library, loaded on pages that show charts.
pub(super) const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct AnalyticsChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Generates JavaScript initialization code for `charts`.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[AnalyticsChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// The month labels and the income and expense totals for each month.
///
/// Months without any transactions of a type get a zero for that type.
pub(super) fn monthly_series(
    totals: &BTreeMap<(YearMonth, TransactionType), f64>,
) -> (Vec<String>, Vec<f64>, Vec<f64>) {
    let mut months: Vec<YearMonth> = totals.keys().map(|(month, _)| *month).collect();
    months.dedup();

    let total_for = |month: YearMonth, type_: TransactionType| {
        totals.get(&(month, type_)).copied().unwrap_or(0.0)
    };

    let labels = months.iter().map(ToString::to_string).collect();
    let income = months
        .iter()
        .map(|month| total_for(*month, TransactionType::Income))
        .collect();
    let expense = months
        .iter()
        .map(|month| total_for(*month, TransactionType::Expense))
        .collect();

    (labels, income, expense)
}

pub(super) fn monthly_income_expense_chart(
    totals: &BTreeMap<(YearMonth, TransactionType), f64>,
) -> Chart {
    let (labels, income, expense) = monthly_series(totals);

    Chart::new()
        .title(Title::new().text("Monthly Income vs Expense").left(20).top("1%"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(60)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name(TransactionType::Income.to_string())
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(income),
        )
        .series(
            bar::Bar::new()
                .name(TransactionType::Expense.to_string())
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(expense),
        )
}

/// A pie chart of `expense_by_category`, as returned by
/// [crate::aggregation::expense_by_category].
pub(super) fn expense_distribution_chart(expense_by_category: &[(String, f64)]) -> Chart {
    let data: Vec<(f64, &str)> = expense_by_category
        .iter()
        .map(|(category, total)| (*total, category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Expense Distribution by Category").left(20).top("1%"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["35%", "65%"])
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
