//! History command handler
//!
//! View and manage search history.

use crate::error::Result;
use crate::history::{History, SearchRecord};
use clap::{Args, Subcommand};

/// History command arguments
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: Option<HistoryCommand>,

    /// Number of entries to show (default: 10)
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,
}

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List history entries
    List {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
    /// Show a specific entry
    Show {
        /// Entry ID (or a unique prefix)
        id: String,
    },
    /// Delete a history entry
    Delete {
        /// Entry ID (or a unique prefix)
        id: String,
    },
    /// Clear all history
    Clear,
}

/// Run the history command
pub fn run(args: HistoryArgs) -> Result<()> {
    let command = args.command.unwrap_or(HistoryCommand::List { count: args.count });

    match command {
        HistoryCommand::List { count } => list_history(count),
        HistoryCommand::Show { id } => show_entry(&id),
        HistoryCommand::Delete { id } => delete_entry(&id),
        HistoryCommand::Clear => clear_history(),
    }
}

/// One-line summary used by `list`
fn summary_line(entry: &SearchRecord) -> String {
    format!(
        "  {} - {} -> {} ({:.2} miles, radius {})\n    {}\n",
        &entry.id[..8.min(entry.id.len())],
        entry.anchor_city,
        entry.closest_city,
        entry.driving_distance,
        entry.radius,
        entry.created_at.to_rfc3339()
    )
}

/// List recent history entries
fn list_history(count: usize) -> Result<()> {
    let history = History::load()?;

    if history.is_empty() {
        println!("No history entries.");
        return Ok(());
    }

    println!("Recent searches ({} of {}):\n", count.min(history.len()), history.len());

    for entry in history.recent(count) {
        println!("{}", summary_line(entry));
    }

    Ok(())
}

/// Show a specific history entry
fn show_entry(id: &str) -> Result<()> {
    let history = History::load()?;

    let entry = history.find_by_prefix(id)?;

    println!("ID: {}", entry.id);
    println!("Created: {}", entry.created_at.to_rfc3339());
    println!("Anchor: {}", entry.anchor_city);
    println!("Radius: {} miles", entry.radius);
    println!("Closest city: {}", entry.closest_city);
    println!("Driving distance: {:.2} miles", entry.driving_distance);
    println!("\nSearched cities ({}):", entry.searched_cities.len());
    for city in &entry.searched_cities {
        println!("  {}", city);
    }

    Ok(())
}

/// Delete a history entry
fn delete_entry(id: &str) -> Result<()> {
    let mut history = History::load()?;

    let full_id = history.find_by_prefix(id)?.id.clone();

    history.remove(&full_id);
    history.save()?;

    println!("Deleted entry: {}", full_id);
    Ok(())
}

/// Clear all history
fn clear_history() -> Result<()> {
    let mut history = History::load()?;
    let count = history.len();

    history.clear();
    history.save()?;

    println!("Cleared {} history entries.", count);
    Ok(())
}
