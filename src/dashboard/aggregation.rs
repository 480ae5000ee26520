//! Transaction data aggregation and transformation for summaries and charts.
//!
//! Provides functions to total transactions by type, bucket them by calendar
//! month, average over the months present in the data, and group expenses by
//! category. Everything here is a pure function of the transaction list and
//! is recomputed on every call.

use std::collections::BTreeMap;

use time::Month;

use crate::transaction::{Transaction, TransactionType};

/// Totals and monthly averages for a list of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinancialSummary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expenses: f64,
    /// Total income minus total expenses. May be negative.
    pub current_balance: f64,
    /// Total income divided by the number of months that have transactions.
    pub average_income_per_month: f64,
    /// Total expenses divided by the number of months that have transactions.
    pub average_expense_per_month: f64,
}

/// A calendar month that transactions are grouped into.
///
/// Buckets order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    /// The calendar year.
    pub year: i32,
    /// The month of the year, from 1 to 12.
    pub month: u8,
}

impl MonthBucket {
    /// The bucket for `transaction`'s date.
    pub fn of(transaction: &Transaction) -> Self {
        Self {
            year: transaction.date.year(),
            month: u8::from(transaction.date.month()),
        }
    }

    /// A label such as "Jan 2024".
    pub fn label(&self) -> String {
        format!("{} {}", month_abbreviation(self.month), self.year)
    }
}

/// Formats a month number (1-12) as a three-letter abbreviation, e.g. "Jan".
fn month_abbreviation(month: u8) -> &'static str {
    match Month::try_from(month) {
        Ok(Month::January) => "Jan",
        Ok(Month::February) => "Feb",
        Ok(Month::March) => "Mar",
        Ok(Month::April) => "Apr",
        Ok(Month::May) => "May",
        Ok(Month::June) => "Jun",
        Ok(Month::July) => "Jul",
        Ok(Month::August) => "Aug",
        Ok(Month::September) => "Sep",
        Ok(Month::October) => "Oct",
        Ok(Month::November) => "Nov",
        Ok(Month::December) => "Dec",
        Err(_) => "???",
    }
}

/// The income and expenses within a single month.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyTotals {
    /// The sum of all income in the month.
    pub income: f64,
    /// The sum of all expenses in the month.
    pub expenses: f64,
}

/// Sums income and expenses for each month that has at least one transaction.
///
/// # Returns
/// Map from month bucket to totals, iterating in chronological order.
pub fn monthly_totals(transactions: &[Transaction]) -> BTreeMap<MonthBucket, MonthlyTotals> {
    let mut totals: BTreeMap<MonthBucket, MonthlyTotals> = BTreeMap::new();

    for transaction in transactions {
        let bucket = totals.entry(MonthBucket::of(transaction)).or_default();

        match transaction.transaction_type {
            TransactionType::Income => bucket.income += transaction.amount,
            TransactionType::Expense => bucket.expenses += transaction.amount,
        }
    }

    totals
}

/// Calculates totals, balance and monthly averages.
///
/// Averages divide by the number of distinct months that have transactions,
/// not by the number of calendar months between the first and last one.
/// With no transactions everything is zero.
pub fn financial_summary(transactions: &[Transaction]) -> FinancialSummary {
    let total_income = sum_of_type(transactions, TransactionType::Income);
    let total_expenses = sum_of_type(transactions, TransactionType::Expense);

    let monthly_totals = monthly_totals(transactions);
    let month_count = monthly_totals.len().max(1) as f64;
    let (monthly_income, monthly_expenses) = monthly_totals
        .values()
        .fold((0.0, 0.0), |(income, expenses), month| {
            (income + month.income, expenses + month.expenses)
        });

    FinancialSummary {
        total_income,
        total_expenses,
        current_balance: total_income - total_expenses,
        average_income_per_month: monthly_income / month_count,
        average_expense_per_month: monthly_expenses / month_count,
    }
}

fn sum_of_type(transactions: &[Transaction], transaction_type: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == transaction_type)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Monthly income and expenses as parallel series, ready for a chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    /// Month labels such as "Jan 2024", in chronological order.
    pub labels: Vec<String>,
    /// The income for each month in `labels`.
    pub income: Vec<f64>,
    /// The expenses for each month in `labels`.
    pub expenses: Vec<f64>,
}

/// Converts monthly totals into sorted labels and values for charting.
pub fn monthly_series(transactions: &[Transaction]) -> MonthlySeries {
    let mut series = MonthlySeries::default();

    for (month, totals) in monthly_totals(transactions) {
        series.labels.push(month.label());
        series.income.push(totals.income);
        series.expenses.push(totals.expenses);
    }

    series
}

/// Expense totals per category as parallel lists, ready for a pie chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    /// Category names in the order they first appear.
    pub categories: Vec<String>,
    /// The total spent in each category in `categories`.
    pub amounts: Vec<f64>,
}

impl CategoryBreakdown {
    /// Whether there are no expenses to show.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Groups expenses by category and sums them. Income is ignored.
pub fn expenses_by_category(transactions: &[Transaction]) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::default();

    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        match breakdown
            .categories
            .iter()
            .position(|category| category == &transaction.category)
        {
            Some(index) => breakdown.amounts[index] += transaction.amount,
            None => {
                breakdown.categories.push(transaction.category.clone());
                breakdown.amounts.push(transaction.amount);
            }
        }
    }

    breakdown
}
