use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use finance_tracker_rs::{
    NewUser, initialize_db,
    logging::{print_error, setup_logging},
    transaction::{Transaction, TransactionType, add_transaction},
    user::{count_users, log_in, register_user},
};

const DEMO_NAME: &str = "Demo User";
const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "password";

/// A utility for creating a test database for the finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            print_error("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            print_error("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        print_error(format!("File already exists at {output_path:#?}!"));
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    register_user(
        NewUser {
            name: DEMO_NAME.to_owned(),
            email: DEMO_EMAIL.to_owned(),
            password: DEMO_PASSWORD.to_owned(),
        },
        &conn,
    )?;

    println!("Registered {} user(s).", count_users(&conn)?);

    let Some(session) = log_in(DEMO_EMAIL, DEMO_PASSWORD, &conn)? else {
        print_error("Could not log in as the test user.");
        exit(1);
    };

    println!("Creating test transactions...");

    let transactions = sample_transactions()?;
    let count = transactions.len();
    for transaction in transactions {
        add_transaction(transaction, &session, &conn)?;
    }

    println!("Added {count} transactions for {DEMO_EMAIL} (password: {DEMO_PASSWORD:?}).");
    println!("Success!");

    Ok(())
}

/// Six months of salary, rent and day to day spending in the first half of 2024.
fn sample_transactions() -> Result<Vec<Transaction>, Box<dyn Error>> {
    let mut transactions = Vec::new();

    for month in 1..=6u8 {
        let month = Month::try_from(month)?;
        let day = |day: u8| Date::from_calendar_date(2024, month, day);
        let extra = f64::from(u8::from(month)) * 10.0;

        transactions.push(
            Transaction::build(TransactionType::Income, "Salary", 50_000.0, day(1)?)
                .description("Monthly salary")
                .finalise(),
        );
        transactions.push(
            Transaction::build(TransactionType::Expense, "Rent", 15_000.0, day(3)?)
                .description("Apartment rent")
                .finalise(),
        );
        transactions.push(
            Transaction::build(TransactionType::Expense, "Food", 4_200.0 + extra, day(10)?)
                .description("Groceries")
                .finalise(),
        );
        transactions.push(
            Transaction::build(TransactionType::Expense, "Transport", 1_500.0 - extra, day(14)?)
                .description("Metro card top up")
                .finalise(),
        );
        transactions.push(
            Transaction::build(TransactionType::Expense, "Bills", 2_300.0, day(20)?)
                .description("Electricity and internet")
                .finalise(),
        );

        if u8::from(month) % 2 == 0 {
            transactions.push(
                Transaction::build(TransactionType::Income, "Misc", 3_000.0, day(25)?)
                    .description("Freelance work")
                    .finalise(),
            );
            transactions.push(
                Transaction::build(TransactionType::Expense, "Misc", 800.0, day(27)?)
                    .description("Birthday gift")
                    .finalise(),
            );
        }
    }

    Ok(transactions)
}
