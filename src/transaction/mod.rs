//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Functions for storing and retrieving each user's transactions
//! - Validation for the transaction form
//! - Filtering and sorting of transaction lists

mod core;
mod form;
mod query;
mod store;

pub use core::{
    EXPENSE_CATEGORIES, INCOME_CATEGORIES, Transaction, TransactionBuilder, TransactionId,
    TransactionType,
};
pub use form::{DATE_FORMAT, MIN_AMOUNT, TransactionForm, parse_date};
pub use query::{
    SortBy, SortOrder, TransactionFilter, UsedCategories, available_categories, sort_transactions,
    transaction_count_label, used_categories,
};
pub use store::{
    add_transaction, delete_transaction, get_transaction_by_id, get_transactions,
    update_transaction,
};
