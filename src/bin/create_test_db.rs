use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::{Connection, Transaction};
use time::{Duration, OffsetDateTime, macros::date};

use cashflow_rs::initialize_db;

/// A utility for creating a test database for the cashflow_rs web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const STATUSES: [&str; 3] = ["Business", "Personal", "Tax"];
const TYPES: [&str; 2] = ["Income", "Expense"];
const CATEGORIES: [(&str, &[&str]); 3] = [
    ("Infrastructure", &["Hosting", "Domains"]),
    ("Marketing", &["Avito", "Farpost"]),
    ("Sales", &["Consulting", "Licences"]),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let mut conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let transaction = conn.transaction()?;

    println!("Creating dictionaries...");
    let status_ids = insert_names(&transaction, "status", &STATUSES)?;
    let type_ids = insert_names(&transaction, "operation_type", &TYPES)?;

    let mut subcategories = Vec::new();
    for (category, subcategory_names) in CATEGORIES {
        transaction.execute("INSERT INTO category (name) VALUES (?1)", (category,))?;
        let category_id = transaction.last_insert_rowid();

        for name in subcategory_names {
            transaction.execute(
                "INSERT INTO subcategory (name, category_id) VALUES (?1, ?2)",
                (name, category_id),
            )?;
            subcategories.push((category_id, transaction.last_insert_rowid()));
        }
    }

    println!("Creating cash flow records...");
    let start = date!(2025 - 01 - 01);
    let now = OffsetDateTime::now_utc();
    let mut record_count = 0;

    for day in 0..31 {
        for n in 0..(day % 3 + 1) {
            let i = (day * 3 + n) as usize;
            let (category_id, subcategory_id) = subcategories[i % subcategories.len()];
            let type_id = type_ids[i % type_ids.len()];
            let amount_cents = 1_000 + (i as i64 * 7_919) % 250_000;
            let comment = (i % 4 == 0).then(|| format!("Sample record {i}"));

            transaction.execute(
                "INSERT INTO cash_flow (date, status_id, type_id, category_id, subcategory_id, \
                    amount, comment, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                (
                    start + Duration::days(day),
                    status_ids[i % status_ids.len()],
                    type_id,
                    category_id,
                    subcategory_id,
                    amount_cents,
                    comment,
                    now,
                ),
            )?;
            record_count += 1;
        }
    }

    transaction.commit()?;

    println!("Created {record_count} cash flow records.");
    println!("Success!");

    Ok(())
}

fn insert_names(
    transaction: &Transaction,
    table: &str,
    names: &[&str],
) -> Result<Vec<i64>, rusqlite::Error> {
    names
        .iter()
        .map(|name| {
            transaction.execute(&format!("INSERT INTO {table} (name) VALUES (?1)"), (name,))?;
            Ok(transaction.last_insert_rowid())
        })
        .collect()
}
