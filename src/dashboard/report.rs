//! The standalone HTML report: summary cards, the transaction table and charts.

use std::path::Path;

use maud::{Markup, html};

use crate::{
    Error, Session,
    dashboard::{
        aggregation::{FinancialSummary, expenses_by_category, monthly_series},
        charts::{
            DashboardChart, charts_script, charts_view, expense_category_chart,
            income_expense_chart,
        },
    },
    html::{
        CARD_STYLE, CATEGORY_BADGE_STYLE, HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    transaction::{Transaction, transaction_count_label},
};

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

const INCOME_TEXT_STYLE: &str = "text-green-600 dark:text-green-400";
const EXPENSE_TEXT_STYLE: &str = "text-red-600 dark:text-red-400";

/// Render the report for `session`.
///
/// `transactions` is every transaction the user has and drives the charts.
/// `filtered` is the already filtered and sorted list shown in the table.
/// The summary is passed in so the caller decides which list it covers.
pub fn render_report(
    session: &Session,
    summary: &FinancialSummary,
    transactions: &[Transaction],
    filtered: &[Transaction],
) -> Markup {
    if transactions.is_empty() {
        return no_data_view(session);
    }

    let charts = build_report_charts(transactions);

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            (report_header(session))
            (summary_cards_view(summary))
            (charts_view(&charts))
            (transaction_table_view(transactions.len(), filtered))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Report", &scripts, &content)
}

/// Write a rendered report to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [Error::ReportWriteError] if the file cannot be written.
pub fn write_report(report: &Markup, path: &Path) -> Result<(), Error> {
    std::fs::write(path, report.0.as_bytes()).map_err(|error| {
        tracing::error!("could not write report to {}: {error}", path.display());
        Error::ReportWriteError {
            path: path.display().to_string(),
            reason: error.to_string(),
        }
    })?;

    tracing::debug!("wrote report to {}", path.display());

    Ok(())
}

/// Only charts with something to draw are included.
fn build_report_charts(transactions: &[Transaction]) -> Vec<DashboardChart> {
    let mut charts = vec![DashboardChart {
        id: "income-expense-chart",
        options: income_expense_chart(&monthly_series(transactions)).to_string(),
    }];

    let breakdown = expenses_by_category(transactions);

    if !breakdown.is_empty() {
        charts.push(DashboardChart {
            id: "expense-category-chart",
            options: expense_category_chart(&breakdown).to_string(),
        });
    }

    charts
}

fn report_header(session: &Session) -> Markup {
    html!(
        header class="w-full mb-6"
        {
            h1 class="text-2xl font-bold" { "Finance Tracker" }
            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                "Report for " (session.name()) " (" (session.email()) ")"
            }
        }
    )
}

fn no_data_view(session: &Session) -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            (report_header(session))

            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p
            {
                "Charts and summaries will show up here once you add some transactions."
            }
        }
    );

    base("Report", &[], &content)
}

fn summary_cards_view(summary: &FinancialSummary) -> Markup {
    let balance_style = if summary.current_balance >= 0.0 {
        INCOME_TEXT_STYLE
    } else {
        EXPENSE_TEXT_STYLE
    };

    html!(
        section
            id="summary"
            class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-5 gap-4 mb-8"
        {
            (summary_card("total-income", "Total Income", summary.total_income, INCOME_TEXT_STYLE))
            (summary_card(
                "total-expenses",
                "Total Expenses",
                summary.total_expenses,
                EXPENSE_TEXT_STYLE
            ))
            (summary_card(
                "current-balance",
                "Current Balance",
                summary.current_balance,
                balance_style
            ))
            (summary_card(
                "average-income",
                "Avg. Income / Month",
                summary.average_income_per_month,
                INCOME_TEXT_STYLE
            ))
            (summary_card(
                "average-expenses",
                "Avg. Expenses / Month",
                summary.average_expense_per_month,
                EXPENSE_TEXT_STYLE
            ))
        }
    )
}

fn summary_card(id: &str, title: &str, amount: f64, amount_style: &str) -> Markup {
    html!(
        div id=(id) class=(CARD_STYLE)
        {
            h3 class="text-sm text-gray-600 dark:text-gray-400" { (title) }
            p class={"text-2xl font-bold " (amount_style)} { (format_currency(amount)) }
        }
    )
}

fn transaction_table_view(total: usize, filtered: &[Transaction]) -> Markup {
    html!(
        section id="transactions" class="w-full"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Transactions" }
                span id="transaction-count" class="text-sm text-gray-600 dark:text-gray-400"
                {
                    (transaction_count_label(total, filtered.len()))
                }
            }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for transaction in filtered {
                            (transaction_row(transaction))
                        }

                        @if filtered.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="5" class={(TABLE_CELL_STYLE) " text-center"}
                                {
                                    "No transactions match the current filters."
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let (sign, amount_style) = if transaction.is_income() {
        ("+", INCOME_TEXT_STYLE)
    } else {
        ("-", EXPENSE_TEXT_STYLE)
    };

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.transaction_type) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class={(TABLE_CELL_STYLE) " text-right font-medium " (amount_style)}
            {
                (sign) (format_currency(transaction.amount))
            }
        }
    )
}
