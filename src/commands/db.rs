//! Store maintenance: schema status, orphan repair and ad-hoc statements.

use crate::{
    db::{
        db::{Db, StatementOutcome},
        migrations::MigrationManager,
        repair::Repair,
    },
    libs::{messages::Message, view::View},
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct DbArgs {
    #[command(subcommand)]
    command: DbCommand,
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Schema version and applied migrations
    Status,
    /// Find and remove rows whose owner is gone
    Repair {
        /// Only report what would be removed
        #[arg(long)]
        dry_run: bool,
    },
    /// Run one SQL statement against the store
    Query { sql: String },
}

pub fn cmd(args: DbArgs) -> Result<()> {
    match args.command {
        DbCommand::Status => handle_status(),
        DbCommand::Repair { dry_run } => handle_repair(dry_run),
        DbCommand::Query { sql } => handle_query(&sql),
    }
}

fn handle_status() -> Result<()> {
    let db = Db::new()?;
    let manager = MigrationManager::new();
    let history = manager.get_migration_history(&db.conn)?;
    let current = history.last().map(|(version, _, _)| *version).unwrap_or(0);

    msg_print!(Message::SchemaVersion(current, manager.latest_version()), true);
    View::migrations(&history)?;
    Ok(())
}

fn handle_repair(dry_run: bool) -> Result<()> {
    let mut repair = Repair::new()?;
    let found = repair.find_orphans()?;

    if found.is_clean() {
        msg_success!(Message::NoOrphansFound);
        return Ok(());
    }

    msg_warning!(Message::OrphansFound(found.total()), true);
    View::orphans(&found)?;

    if dry_run {
        return Ok(());
    }
    let removed = repair.repair()?;
    msg_success!(Message::OrphansRemoved(removed.total()));
    Ok(())
}

fn handle_query(sql: &str) -> Result<()> {
    match Db::new()?.execute(sql, &[])? {
        StatementOutcome::Rows(rows) if rows.is_empty() => msg_info!(Message::QueryReturnedNoRows),
        StatementOutcome::Rows(rows) => View::rows(&rows)?,
        StatementOutcome::Changed { changes, inserted_id } => {
            msg_success!(Message::StatementApplied(changes, inserted_id));
        }
    }
    Ok(())
}
