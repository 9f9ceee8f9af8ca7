//! Clause rewriting example
//!
//! Parses a statement, prints its top-level clauses, then adds, replaces
//! and removes clauses while keeping SQL clause order.
//!
//! Run with: cargo run --example rewrite_clauses

use sqltag::{parse, ClauseKind};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut doc = parse("SELECT id, total FROM invoices FOR UPDATE")?;

    for clause in ClauseKind::ALL {
        if doc.has_clause(clause) {
            println!("{clause:>10}: {}", doc.get_clause(clause));
        }
    }

    doc.set_clause(ClauseKind::Where, "status = 'sent' AND due < CURRENT_DATE")?;
    doc.set_clause(ClauseKind::OrderBy, "due")?;
    println!("{doc}");

    doc.set_clause(ClauseKind::ForUpdate, "")?;
    println!("{doc}");

    println!("{}", serde_json::to_string_pretty(&doc.snapshot())?);
    Ok(())
}
