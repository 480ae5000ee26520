//! Dashboard module
//!
//! Summarises a user's transactions and renders the summaries, the
//! transaction table and charts as a standalone HTML report.

mod aggregation;
mod charts;
mod report;

pub use aggregation::{
    CategoryBreakdown, FinancialSummary, MonthBucket, MonthlySeries, MonthlyTotals,
    expenses_by_category, financial_summary, monthly_series, monthly_totals,
};
pub use charts::{
    DashboardChart, charts_script, charts_view, expense_category_chart, income_expense_chart,
};
pub use report::{render_report, write_report};
