//! Filtering and sorting for transaction lists.
//!
//! Filter first, then sort. Both keep the relative order of transactions
//! that they do not distinguish between.

use std::cmp::Ordering;

use time::Date;

use super::core::{Transaction, TransactionType};

/// Narrows a list of transactions down. Every field that is set must match.
///
/// The default filter matches every transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only keep transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Only keep transactions in this category. An empty string matches everything.
    pub category: Option<String>,
    /// Only keep transactions on or after this date.
    pub start_date: Option<Date>,
    /// Only keep transactions on or before this date.
    pub end_date: Option<Date>,
}

impl TransactionFilter {
    /// Whether `transaction` passes every filter that is set.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let type_matches = self
            .transaction_type
            .is_none_or(|transaction_type| transaction.transaction_type == transaction_type);
        let category_matches = self
            .category
            .as_deref()
            .filter(|category| !category.is_empty())
            .is_none_or(|category| transaction.category == category);
        let after_start = self.start_date.is_none_or(|start| transaction.date >= start);
        let before_end = self.end_date.is_none_or(|end| transaction.date <= end);

        type_matches && category_matches && after_start && before_end
    }

    /// Whether any filter is set.
    pub fn is_active(&self) -> bool {
        self.transaction_type.is_some()
            || self.category.as_deref().is_some_and(|category| !category.is_empty())
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    /// Keep the transactions that match, in their original order.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .cloned()
            .collect()
    }
}

/// The field to sort transactions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Sort by amount.
    Amount,
    /// Sort by date.
    #[default]
    Date,
}

/// The order to sort transactions in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    #[default]
    Descending,
}

/// Sort `transactions` in place.
///
/// The sort is stable in both directions: transactions with the same amount
/// (or date) stay in the order they were given in.
pub fn sort_transactions(transactions: &mut [Transaction], sort_by: SortBy, sort_order: SortOrder) {
    let compare = |a: &Transaction, b: &Transaction| -> Ordering {
        match sort_by {
            SortBy::Amount => a.amount.total_cmp(&b.amount),
            SortBy::Date => a.date.cmp(&b.date),
        }
    };

    match sort_order {
        SortOrder::Ascending => transactions.sort_by(compare),
        SortOrder::Descending => transactions.sort_by(|a, b| compare(b, a)),
    }
}

/// The categories in use, split by transaction type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedCategories {
    /// Categories used by at least one income, in first-seen order.
    pub income: Vec<String>,
    /// Categories used by at least one expense, in first-seen order.
    pub expense: Vec<String>,
}

/// List the distinct categories used by income and by expenses.
pub fn used_categories(transactions: &[Transaction]) -> UsedCategories {
    let mut categories = UsedCategories::default();

    for transaction in transactions {
        let list = match transaction.transaction_type {
            TransactionType::Income => &mut categories.income,
            TransactionType::Expense => &mut categories.expense,
        };

        if !list.contains(&transaction.category) {
            list.push(transaction.category.clone());
        }
    }

    categories
}

/// List every distinct category in use, sorted alphabetically.
pub fn available_categories(transactions: &[Transaction]) -> Vec<String> {
    let mut categories: Vec<String> = transactions
        .iter()
        .map(|transaction| transaction.category.clone())
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

/// Describe how many transactions are shown, e.g. "2 of 5 transactions".
pub fn transaction_count_label(total: usize, filtered: usize) -> String {
    let noun = if total == 1 { "transaction" } else { "transactions" };

    if total == filtered {
        format!("{total} {noun}")
    } else {
        format!("{filtered} of {total} {noun}")
    }
}
