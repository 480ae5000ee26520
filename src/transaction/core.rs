//! Defines the core data model for transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

/// The categories an income can be filed under.
pub const INCOME_CATEGORIES: [&str; 2] = ["Salary", "Misc"];

/// The categories an expense can be filed under.
pub const EXPENSE_CATEGORIES: [&str; 5] = ["Food", "Transport", "Bills", "Rent", "Misc"];

/// A string ID that identifies a transaction across all users.
///
/// The stores do not check IDs for uniqueness, so new IDs should come from
/// [TransactionId::new_random].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wrap an existing ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random (UUID v4) ID.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    Expense,
}

impl TransactionType {
    /// The categories a transaction of this type may use.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            Self::Income => &INCOME_CATEGORIES,
            Self::Expense => &EXPENSE_CATEGORIES,
        }
    }

    /// Whether `category` is one of this type's categories.
    pub fn allows_category(self, category: &str) -> bool {
        self.categories().contains(&category)
    }

    /// The name used in storage and on screen.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    /// Parse "Income" or "Expense", ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!(
                "\"{other}\" is not a transaction type, expected \"Income\" or \"Expense\""
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The category of the transaction, e.g. "Food" or "Salary".
    pub category: String,
    /// The amount of money spent or earned. Always positive, see `transaction_type`.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for. May be empty.
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        transaction_type: TransactionType,
        category: &str,
        amount: f64,
        date: Date,
    ) -> TransactionBuilder {
        TransactionBuilder {
            id: None,
            transaction_type,
            category: category.to_owned(),
            amount,
            date,
            description: String::new(),
        }
    }

    /// Whether this transaction is an income.
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    /// Whether this transaction is an expense.
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```
/// use time::macros::date;
///
/// use finance_tracker_rs::transaction::{Transaction, TransactionType};
///
/// let date = date!(2024 - 01 - 15);
/// let transaction = Transaction::build(TransactionType::Expense, "Food", 12.5, date)
///     .description("Lunch")
///     .finalise();
///
/// assert_eq!(transaction.description, "Lunch");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The ID to use, or `None` to generate a random one.
    pub id: Option<TransactionId>,
    /// Whether the transaction is an income or an expense.
    pub transaction_type: TransactionType,
    /// The category of the transaction.
    pub category: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// A human-readable description of the transaction.
    pub description: String,
}

impl TransactionBuilder {
    /// Set the ID of the transaction, e.g. when replacing an edited transaction.
    pub fn id(mut self, id: TransactionId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the description of the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Create the transaction, generating an ID if none was set.
    pub fn finalise(self) -> Transaction {
        Transaction {
            id: self.id.unwrap_or_else(TransactionId::new_random),
            transaction_type: self.transaction_type,
            category: self.category,
            amount: self.amount,
            date: self.date,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use time::macros::date;

    use super::{Transaction, TransactionId, TransactionType};

    #[test]
    fn serializes_with_type_field_and_iso_date() {
        let date = date!(2024 - 01 - 15);
        let transaction = Transaction::build(TransactionType::Income, "Salary", 1000.0, date)
            .id(TransactionId::new("abc"))
            .finalise();

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc",
                "type": "Income",
                "category": "Salary",
                "amount": 1000.0,
                "date": "2024-01-15",
                "description": ""
            })
        );
    }

    #[test]
    fn deserializes_without_description() {
        let json =
            r#"{"id":"1","type":"Expense","category":"Rent","amount":300,"date":"2024-01-20"}"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.amount, 300.0);
        assert_eq!(transaction.date, date!(2024 - 01 - 20));
        assert_eq!(transaction.description, "");
    }

    #[test]
    fn finalise_generates_distinct_ids() {
        let builder =
            Transaction::build(TransactionType::Expense, "Food", 5.0, date!(2024 - 03 - 01));

        let first = builder.clone().finalise();
        let second = builder.finalise();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn categories_depend_on_type() {
        assert!(TransactionType::Income.allows_category("Salary"));
        assert!(!TransactionType::Income.allows_category("Rent"));
        assert!(TransactionType::Expense.allows_category("Rent"));
        assert!(TransactionType::Expense.allows_category("Misc"));
        assert!(!TransactionType::Expense.allows_category("Salary"));
    }

    #[test]
    fn transaction_type_parses_case_insensitively() {
        assert_eq!(TransactionType::from_str("income"), Ok(TransactionType::Income));
        assert_eq!(TransactionType::from_str("EXPENSE"), Ok(TransactionType::Expense));
        assert!(TransactionType::from_str("refund").is_err());
    }
}
