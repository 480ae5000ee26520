//! The form for creating and editing transactions, and its validation rules.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::form::{FieldError, is_blank};

use super::core::{Transaction, TransactionId, TransactionType};

/// The format dates are entered and stored in, e.g. "2024-01-15".
pub const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The smallest amount a transaction can have.
pub const MIN_AMOUNT: f64 = 0.01;

/// Parse a date in the [DATE_FORMAT].
///
/// # Errors
///
/// Returns a [FieldError] for `field` if `text` is not a valid date.
pub fn parse_date(field: &'static str, text: &str) -> Result<Date, FieldError> {
    Date::parse(text.trim(), DATE_FORMAT)
        .map_err(|_| FieldError::new(field, "Date must be in the format YYYY-MM-DD"))
}

/// The raw input from the transaction form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionForm {
    /// The amount of money, e.g. "12.50".
    pub amount: String,
    /// "Income" or "Expense".
    pub transaction_type: String,
    /// One of the categories allowed for the transaction type.
    pub category: String,
    /// The date in the [DATE_FORMAT].
    pub date: String,
    /// An optional description.
    pub description: String,
}

impl TransactionForm {
    /// An empty form for a new income dated `today`.
    pub fn for_new(today: Date) -> Self {
        Self {
            transaction_type: TransactionType::Income.to_string(),
            date: today.to_string(),
            ..Default::default()
        }
    }

    /// A form filled in with an existing transaction, ready for editing.
    pub fn for_edit(transaction: &Transaction) -> Self {
        Self {
            amount: transaction.amount.to_string(),
            transaction_type: transaction.transaction_type.to_string(),
            category: transaction.category.clone(),
            date: transaction.date.to_string(),
            description: transaction.description.clone(),
        }
    }

    /// Check every field and turn the form into a transaction.
    ///
    /// Pass the ID of the transaction being edited as `id`, or `None` to
    /// generate a new ID.
    ///
    /// # Errors
    ///
    /// Returns one [FieldError] per invalid field.
    pub fn validate(&self, id: Option<TransactionId>) -> Result<Transaction, Vec<FieldError>> {
        let mut errors = Vec::new();

        let amount = match self.amount.trim() {
            "" => {
                errors.push(FieldError::required("amount"));
                None
            }
            text => match text.parse::<f64>() {
                Ok(amount) if amount.is_finite() && amount >= MIN_AMOUNT => Some(amount),
                Ok(_) => {
                    errors.push(FieldError::new("amount", "Amount must be greater than 0"));
                    None
                }
                Err(_) => {
                    errors.push(FieldError::new("amount", "Amount must be a number"));
                    None
                }
            },
        };

        let transaction_type = if is_blank(&self.transaction_type) {
            errors.push(FieldError::required("type"));
            None
        } else {
            self.transaction_type
                .parse::<TransactionType>()
                .map_err(|_| {
                    errors.push(FieldError::new("type", "Type must be Income or Expense"));
                })
                .ok()
        };

        let category = self.category.trim();
        if category.is_empty() {
            errors.push(FieldError::required("category"));
        } else if let Some(transaction_type) =
            transaction_type.filter(|transaction_type| !transaction_type.allows_category(category))
        {
            errors.push(FieldError::new(
                "category",
                format!(
                    "Category must be one of: {}",
                    transaction_type.categories().join(", ")
                ),
            ));
        }

        let date = if is_blank(&self.date) {
            errors.push(FieldError::required("date"));
            None
        } else {
            parse_date("date", &self.date)
                .map_err(|error| errors.push(error))
                .ok()
        };

        match (amount, transaction_type, date) {
            (Some(amount), Some(transaction_type), Some(date)) if errors.is_empty() => {
                let builder = Transaction::build(transaction_type, category, amount, date)
                    .description(self.description.trim());

                Ok(match id {
                    Some(id) => builder.id(id).finalise(),
                    None => builder.finalise(),
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        FieldError,
        transaction::{Transaction, TransactionId, TransactionType},
    };

    use super::TransactionForm;

    fn valid_form() -> TransactionForm {
        TransactionForm {
            amount: "12.50".to_owned(),
            transaction_type: "Expense".to_owned(),
            category: "Food".to_owned(),
            date: "2024-01-15".to_owned(),
            description: " Lunch ".to_owned(),
        }
    }

    #[test]
    fn valid_form_creates_transaction() {
        let transaction = valid_form().validate(None).unwrap();

        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.category, "Food");
        assert_eq!(transaction.amount, 12.5);
        assert_eq!(transaction.date, date!(2024 - 01 - 15));
        assert_eq!(transaction.description, "Lunch");
    }

    #[test]
    fn editing_keeps_id() {
        let id = TransactionId::new("existing");

        let transaction = valid_form().validate(Some(id.clone())).unwrap();

        assert_eq!(transaction.id, id);
    }

    #[test]
    fn empty_form_reports_required_fields() {
        let errors = TransactionForm::default().validate(None).unwrap_err();

        assert_eq!(
            errors,
            vec![
                FieldError::new("amount", "Amount is required"),
                FieldError::new("type", "Type is required"),
                FieldError::new("category", "Category is required"),
                FieldError::new("date", "Date is required"),
            ]
        );
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        for amount in ["0", "-5", "0.001"] {
            let form = TransactionForm {
                amount: amount.to_owned(),
                ..valid_form()
            };

            assert_eq!(
                form.validate(None),
                Err(vec![FieldError::new("amount", "Amount must be greater than 0")]),
                "amount {amount} should be rejected"
            );
        }
    }

    #[test]
    fn category_must_match_type() {
        let form = TransactionForm {
            transaction_type: "Income".to_owned(),
            category: "Rent".to_owned(),
            ..valid_form()
        };

        assert_eq!(
            form.validate(None),
            Err(vec![FieldError::new(
                "category",
                "Category must be one of: Salary, Misc"
            )])
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        let form = TransactionForm {
            date: "15/01/2024".to_owned(),
            ..valid_form()
        };

        let errors = form.validate(None).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "date");
    }

    #[test]
    fn edit_form_round_trips_transaction() {
        let date = date!(2024 - 02 - 10);
        let transaction = Transaction::build(TransactionType::Income, "Salary", 1000.0, date)
            .description("February pay")
            .finalise();

        let form = TransactionForm::for_edit(&transaction);

        assert_eq!(form.validate(Some(transaction.id.clone())), Ok(transaction));
    }

    #[test]
    fn new_form_defaults_to_income_today() {
        let form = TransactionForm::for_new(date!(2024 - 05 - 06));

        assert_eq!(form.transaction_type, "Income");
        assert_eq!(form.date, "2024-05-06");
        assert!(form.amount.is_empty());
    }
}
