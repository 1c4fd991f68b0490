//! CLI argument parsing and one-shot subcommands.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use askdb_catalog::Catalog;
use askdb_nlq::QueryEngine;

use crate::auth::hash_password;

/// Answer plain-English analytics questions from an in-memory catalog.
#[derive(Parser, Debug)]
#[command(name = "askdb", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Translate and execute a question.
    Ask { question: String },
    /// Show how a question would be processed.
    Explain { question: String },
    /// Check a question against the catalog.
    Validate { question: String },
    /// Execute pseudo-SQL text directly.
    Sql { query: String },
    /// Print the stored digest for a password.
    HashPassword { password: String },
}

/// Run a one-shot command, printing its JSON result to stdout.
///
/// Returns `Ok(false)` when the caller should start the server instead.
pub fn dispatch(command: Option<Command>) -> anyhow::Result<bool> {
    let engine = || QueryEngine::new(Arc::new(Catalog::seeded()));
    match command {
        None | Some(Command::Serve) => return Ok(false),
        Some(Command::Ask { question }) => print_json(&engine().ask(&question))?,
        Some(Command::Explain { question }) => print_json(&engine().explain(&question))?,
        Some(Command::Validate { question }) => print_json(&engine().validate(&question))?,
        Some(Command::Sql { query }) => print_json(&engine().execute_sql(&query))?,
        Some(Command::HashPassword { password }) => println!("{}", hash_password(&password)),
    }
    Ok(true)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
