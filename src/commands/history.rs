use crate::{
    db::executions::Executions,
    libs::{config::Config, execution::compute_weekly_streak, formatter::now, messages::Message, view::View},
    msg_error_anyhow, msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of runs to show
    #[arg(short, long)]
    limit: Option<u32>,
    /// Show runs that were started but not finished
    #[arg(short, long)]
    open: bool,
    /// Show the subtask checklist of one run
    #[arg(short, long, conflicts_with = "open")]
    execution: Option<i64>,
}

pub fn cmd(args: HistoryArgs) -> Result<()> {
    let executions = Executions::new()?;

    if let Some(execution_id) = args.execution {
        let entry = executions
            .get_entry(execution_id)?
            .ok_or_else(|| msg_error_anyhow!(Message::ExecutionNotFound(execution_id)))?;
        let statuses = executions.list_subtask_statuses(execution_id)?;

        msg_print!(Message::ExecutionHeader(entry.block_name, entry.status.to_string()), true);
        if statuses.is_empty() {
            msg_info!(Message::NoSubtaskStatuses);
            return Ok(());
        }
        View::subtask_statuses(&statuses)?;
        return Ok(());
    }

    if args.open {
        let open = executions.list_open()?;
        if open.is_empty() {
            msg_info!(Message::NoOpenExecutions);
            return Ok(());
        }
        msg_print!(Message::OpenExecutionsHeader, true);
        View::history(&open)?;
        return Ok(());
    }

    let limit = match args.limit {
        Some(limit) => limit,
        None => Config::read()?.history_limit(),
    };
    let history = executions.list_history(limit)?;
    if history.is_empty() {
        msg_info!(Message::NoHistory);
        return Ok(());
    }

    msg_print!(Message::HistoryHeader, true);
    View::history(&history)?;

    let everything = executions.list_history(u32::MAX)?;
    msg_print!(Message::WeeklyStreak(compute_weekly_streak(&everything, now())), true);
    Ok(())
}
