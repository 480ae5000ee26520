use std::{error::Error, io, path::PathBuf, process::exit};

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use time::Date;

use finance_tracker_rs::{
    FieldError, Session,
    dashboard::{
        expenses_by_category, financial_summary, monthly_totals, render_report, write_report,
    },
    html::format_currency,
    initialize_db,
    log_in::{INVALID_CREDENTIALS_MESSAGE, LogInForm},
    log_out::log_out,
    logging::{print_error, setup_logging},
    register_user::RegisterForm,
    timezone::today,
    transaction::{
        EXPENSE_CATEGORIES, INCOME_CATEGORIES, SortBy, SortOrder, Transaction, TransactionFilter,
        TransactionForm, TransactionId, TransactionType, add_transaction, delete_transaction,
        get_transaction_by_id, get_transactions, parse_date, sort_transactions,
        transaction_count_label, update_transaction, used_categories,
    },
    user::{get_current_user, log_in, register_user},
};

const NOT_LOGGED_IN_MESSAGE: &str = "you are not logged in, run `pft log-in` first";

/// Track personal income and expenses from the command line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "PFT_DB_PATH", default_value = "finance_tracker.db")]
    db_path: PathBuf,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    #[arg(long, env = "PFT_TIMEZONE", default_value = "Etc/UTC")]
    timezone: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new account. The password is read from a hidden prompt.
    Register {
        /// Your display name.
        #[arg(long)]
        name: String,

        /// The email address you will log in with.
        #[arg(long)]
        email: String,
    },
    /// Log in. The password is read from a hidden prompt.
    LogIn {
        /// The email address you registered with.
        #[arg(long)]
        email: String,
    },
    /// Log out of the current session.
    LogOut,
    /// Show who is logged in.
    Whoami,
    /// Record a new transaction.
    Add(TransactionFields),
    /// Change an existing transaction. Fields that are not given are kept.
    Edit {
        /// The ID of the transaction to edit.
        id: String,

        #[command(flatten)]
        fields: TransactionFields,
    },
    /// Delete a transaction.
    Delete {
        /// The ID of the transaction to delete.
        id: String,
    },
    /// Show a single transaction.
    Show {
        /// The ID of the transaction to show.
        id: String,
    },
    /// List transactions, optionally filtered and sorted.
    List(ListOptions),
    /// Show totals, monthly averages and the expense breakdown.
    Summary,
    /// Show the categories for each transaction type and which ones are in use.
    Categories,
    /// Write an HTML report with summaries, charts and the transaction table.
    Report {
        /// Where to write the report.
        #[arg(long, short, default_value = "report.html")]
        output: PathBuf,

        #[command(flatten)]
        list: ListOptions,
    },
}

#[derive(ClapArgs, Debug)]
struct TransactionFields {
    /// The amount, e.g. 12.50.
    #[arg(long)]
    amount: Option<String>,

    /// Either "income" or "expense".
    #[arg(long = "type")]
    transaction_type: Option<String>,

    /// The category, e.g. "Salary" or "Food".
    #[arg(long)]
    category: Option<String>,

    /// The date in the format YYYY-MM-DD. New transactions default to today.
    #[arg(long)]
    date: Option<String>,

    /// A short note about the transaction.
    #[arg(long)]
    description: Option<String>,
}

impl TransactionFields {
    fn fill_in(self, mut form: TransactionForm) -> TransactionForm {
        if let Some(amount) = self.amount {
            form.amount = amount;
        }
        if let Some(transaction_type) = self.transaction_type {
            form.transaction_type = transaction_type;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(date) = self.date {
            form.date = date;
        }
        if let Some(description) = self.description {
            form.description = description;
        }

        form
    }
}

#[derive(ClapArgs, Debug)]
struct ListOptions {
    /// Only show transactions of this type.
    #[arg(long = "type", value_parser = parse_transaction_type)]
    transaction_type: Option<TransactionType>,

    /// Only show transactions in this category.
    #[arg(long)]
    category: Option<String>,

    /// Only show transactions on or after this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<Date>,

    /// Only show transactions on or before this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date_arg)]
    to: Option<Date>,

    /// The field to sort by.
    #[arg(long, value_enum, default_value_t = SortField::Date)]
    sort_by: SortField,

    /// The direction to sort in.
    #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
    order: SortDirection,
}

impl ListOptions {
    fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            transaction_type: self.transaction_type,
            category: self.category.clone(),
            start_date: self.from,
            end_date: self.to,
        }
    }

    /// Filter then sort.
    fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let mut filtered = self.filter().apply(transactions);
        sort_transactions(&mut filtered, self.sort_by.into(), self.order.into());
        filtered
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SortField {
    Amount,
    Date,
}

impl From<SortField> for SortBy {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Amount => SortBy::Amount,
            SortField::Date => SortBy::Date,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SortDirection {
    Asc,
    Desc,
}

impl From<SortDirection> for SortOrder {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => SortOrder::Ascending,
            SortDirection::Desc => SortOrder::Descending,
        }
    }
}

fn parse_transaction_type(text: &str) -> Result<TransactionType, String> {
    text.parse()
}

fn parse_date_arg(text: &str) -> Result<Date, String> {
    parse_date("date", text).map_err(|error| error.to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    match args.command {
        Command::Register { name, email } => register(name, email, &conn)?,
        Command::LogIn { email } => log_in_user(email, &conn)?,
        Command::LogOut => match log_out(&conn)? {
            Some(session) => println!("Logged out {}.", session.email()),
            None => println!("Nobody is logged in."),
        },
        Command::Whoami => match get_current_user(&conn)? {
            Some(session) => println!("{} <{}>", session.name(), session.email()),
            None => println!("Nobody is logged in."),
        },
        Command::Add(fields) => {
            let session = require_session(&conn)?;
            let form = fields.fill_in(TransactionForm::for_new(today(&args.timezone)?));
            let transaction = validate_or_exit(form.validate(None));
            let id = transaction.id.clone();

            add_transaction(transaction, &session, &conn)?;
            println!("Added transaction {id}.");
        }
        Command::Edit { id, fields } => {
            let session = require_session(&conn)?;
            let id = TransactionId::new(id);
            let Some(existing) = get_transaction_by_id(&id, &session, &conn)? else {
                print_error(format!("there is no transaction with the ID {id}"));
                exit(1);
            };
            let form = fields.fill_in(TransactionForm::for_edit(&existing));
            let transaction = validate_or_exit(form.validate(Some(id.clone())));

            if update_transaction(transaction, &session, &conn)? {
                println!("Updated transaction {id}.");
            } else {
                print_error(format!("there is no transaction with the ID {id}"));
                exit(1);
            }
        }
        Command::Delete { id } => {
            let session = require_session(&conn)?;
            let id = TransactionId::new(id);

            if delete_transaction(&id, &session, &conn)? {
                println!("Deleted transaction {id}.");
            } else {
                print_error(format!("there is no transaction with the ID {id}"));
                exit(1);
            }
        }
        Command::Show { id } => {
            let session = require_session(&conn)?;
            let id = TransactionId::new(id);

            match get_transaction_by_id(&id, &session, &conn)? {
                Some(transaction) => print_transaction_details(&transaction),
                None => {
                    print_error(format!("there is no transaction with the ID {id}"));
                    exit(1);
                }
            }
        }
        Command::List(options) => {
            let session = require_session(&conn)?;
            let transactions = get_transactions(&session, &conn)?;
            let filtered = options.apply(&transactions);

            if transactions.is_empty() {
                println!("No transactions yet, add one with `pft add`.");
                return Ok(());
            }

            if filtered.is_empty() && options.filter().is_active() {
                println!("No transactions match the filters.");
            }
            for transaction in &filtered {
                print_transaction_row(transaction);
            }
            println!("{}", transaction_count_label(transactions.len(), filtered.len()));
        }
        Command::Summary => {
            let session = require_session(&conn)?;
            let transactions = get_transactions(&session, &conn)?;
            print_summary(&transactions);
        }
        Command::Categories => {
            let session = require_session(&conn)?;
            let transactions = get_transactions(&session, &conn)?;
            let used = used_categories(&transactions);

            println!("Income categories: {}", INCOME_CATEGORIES.join(", "));
            println!("Expense categories: {}", EXPENSE_CATEGORIES.join(", "));
            println!("Used for income: {}", list_or_none(&used.income));
            println!("Used for expenses: {}", list_or_none(&used.expense));
        }
        Command::Report { output, list } => {
            let session = require_session(&conn)?;
            let transactions = get_transactions(&session, &conn)?;
            let filtered = list.apply(&transactions);
            let summary = financial_summary(&transactions);

            let report = render_report(&session, &summary, &transactions, &filtered);
            write_report(&report, &output)?;
            println!("Wrote report to {}", output.display());
        }
    }

    Ok(())
}

fn require_session(conn: &Connection) -> Result<Session, Box<dyn Error>> {
    match get_current_user(conn)? {
        Some(session) => Ok(session),
        None => {
            print_error(NOT_LOGGED_IN_MESSAGE);
            exit(1);
        }
    }
}

fn validate_or_exit<T>(result: Result<T, Vec<FieldError>>) -> T {
    match result {
        Ok(value) => value,
        Err(errors) => {
            for error in errors {
                print_error(error);
            }
            exit(1);
        }
    }
}

fn register(name: String, email: String, conn: &Connection) -> Result<(), Box<dyn Error>> {
    let Some(password) = prompt_password("Choose a password: ") else {
        return Ok(());
    };
    let Some(confirm_password) = prompt_password("Enter the same password again: ") else {
        return Ok(());
    };

    let form = RegisterForm {
        name,
        email,
        password,
        confirm_password,
    };
    let new_user = validate_or_exit(form.validate());
    let email = new_user.email.clone();

    match register_user(new_user, conn) {
        Ok(()) => {
            println!("Registered {email}. Run `pft log-in --email {email}` to log in.");
            Ok(())
        }
        Err(finance_tracker_rs::Error::DuplicateEmail) => {
            print_error(finance_tracker_rs::Error::DuplicateEmail);
            exit(1);
        }
        Err(error) => Err(error.into()),
    }
}

fn log_in_user(email: String, conn: &Connection) -> Result<(), Box<dyn Error>> {
    let Some(password) = prompt_password("Password: ") else {
        return Ok(());
    };

    let form = LogInForm { email, password };
    let email = validate_or_exit(form.validate());

    match log_in(email, &form.password, conn)? {
        Some(session) => {
            println!("Welcome, {}!", session.name());
            Ok(())
        }
        None => {
            print_error(INVALID_CREDENTIALS_MESSAGE);
            exit(1);
        }
    }
}

/// Read a password without echoing it. Returns `None` if stdin was closed.
fn prompt_password(prompt: &str) -> Option<String> {
    match rpassword::prompt_password(prompt) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn print_transaction_row(transaction: &Transaction) {
    let sign = if transaction.is_income() { "+" } else { "-" };

    println!(
        "{}  {:<7}  {:<9}  {:>14}  {}  {}",
        transaction.date,
        transaction.transaction_type,
        transaction.category,
        format!("{sign}{}", format_currency(transaction.amount)),
        transaction.id,
        transaction.description,
    );
}

fn print_transaction_details(transaction: &Transaction) {
    println!("ID:          {}", transaction.id);
    println!("Type:        {}", transaction.transaction_type);
    println!("Category:    {}", transaction.category);
    println!("Amount:      {}", format_currency(transaction.amount));
    println!("Date:        {}", transaction.date);
    println!("Description: {}", transaction.description);
}

fn print_summary(transactions: &[Transaction]) {
    let summary = financial_summary(transactions);

    println!("Total income:          {}", format_currency(summary.total_income));
    println!("Total expenses:        {}", format_currency(summary.total_expenses));
    println!("Current balance:       {}", format_currency(summary.current_balance));
    println!("Avg. income / month:   {}", format_currency(summary.average_income_per_month));
    println!("Avg. expenses / month: {}", format_currency(summary.average_expense_per_month));

    let months = monthly_totals(transactions);
    if !months.is_empty() {
        println!();
        println!("{:<10}  {:>14}  {:>14}", "Month", "Income", "Expenses");
        for (month, totals) in months {
            println!(
                "{:<10}  {:>14}  {:>14}",
                month.label(),
                format_currency(totals.income),
                format_currency(totals.expenses)
            );
        }
    }

    let breakdown = expenses_by_category(transactions);
    if !breakdown.is_empty() {
        println!();
        println!("Expenses by category:");
        for (category, amount) in breakdown.categories.iter().zip(&breakdown.amounts) {
            println!("  {category:<9}  {:>14}", format_currency(*amount));
        }
    }
}

fn list_or_none(categories: &[String]) -> String {
    if categories.is_empty() {
        "none".to_owned()
    } else {
        categories.join(", ")
    }
}
