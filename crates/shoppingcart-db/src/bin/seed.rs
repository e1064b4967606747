//! # Seed Data Loader
//!
//! Creates the schema and loads the reference cart fixture.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by the config file / environment
//! cargo run -p shoppingcart-db --bin seed
//!
//! # Specify database path
//! cargo run -p shoppingcart-db --bin seed -- --db ./data/shoppingcart.db
//! ```
//!
//! ## Fixture
//! - products: banana (1000, woowa1.com), apple (2000, woowa2.com)
//! - cart rows for customer 1: banana, apple
//!
//! A database that already holds products or cart rows is left as is.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use shoppingcart_db::fixture::{load_reference_fixture, FixtureOutcome};
use shoppingcart_db::{Database, PersistenceResult, StoreConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: `info,shoppingcart=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shoppingcart=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Parses `--db PATH` and `--config PATH`.
fn parse_args() -> Result<(Option<PathBuf>, Option<PathBuf>), String> {
    let mut db_path = None;
    let mut config_path = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_path = Some(args.next().ok_or("--db requires a path")?.into()),
            "--config" => {
                config_path = Some(args.next().ok_or("--config requires a path")?.into())
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }

    Ok((db_path, config_path))
}

async fn seed(db: &Database) -> PersistenceResult<()> {
    match load_reference_fixture(db).await? {
        FixtureOutcome::Loaded(items) => match serde_json::to_string_pretty(&items) {
            Ok(json) => println!("{}", json),
            Err(e) => error!(error = %e, "Could not render cart rows"),
        },
        FixtureOutcome::Skipped {
            products,
            cart_rows,
        } => {
            println!(
                "Database already has {} products and {} cart rows; skipping seed.",
                products, cart_rows
            );
            println!("Delete the database file to regenerate.");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let (db_path, config_path) = match parse_args() {
        Ok(parsed) => parsed,
        Err(message) => {
            error!("{}", message);
            eprintln!("usage: seed [--db PATH] [--config PATH]");
            return ExitCode::from(2);
        }
    };

    let mut config = match StoreConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid store configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = db_path {
        config.database.path = path;
    }

    info!(path = %config.database.path.display(), "Seeding database");

    let db = match Database::from_config(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Could not open database");
            return ExitCode::FAILURE;
        }
    };

    let outcome = seed(&db).await;
    db.close().await;

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Seeding failed");
            ExitCode::FAILURE
        }
    }
}
