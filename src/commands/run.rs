//! Spinning a roulette and running a block.
//!
//! A run is started in the store, the subtasks are ticked in an interactive
//! checklist, and the result is written once when the user finishes.

use crate::{
    db::{
        blocks::Blocks,
        executions::Executions,
        settings::{Settings, LAST_ROULETTE_KEY},
    },
    libs::{config::Config, execution::ActiveExecution, messages::macros::is_debug_mode, messages::Message, roulette::spin_roulette},
    msg_bail_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

const DISPLAY_SPIN_DELAY: Duration = Duration::from_millis(60);

#[derive(Debug, Args)]
pub struct SpinArgs {
    /// Roulette to spin; defaults to the last one spun
    roulette_id: Option<i64>,
    /// Start the winning option right away
    #[arg(short, long)]
    run: bool,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Block to run
    #[arg(required_unless_present_any = ["event", "abandon"])]
    block_id: Option<i64>,
    /// Run the block assigned to a calendar event
    #[arg(short, long, conflicts_with = "block_id")]
    event: Option<i64>,
    /// Discard an unfinished run
    #[arg(long, conflicts_with_all = ["block_id", "event"])]
    abandon: Option<i64>,
}

pub fn spin(args: SpinArgs) -> Result<()> {
    let mut settings = Settings::new()?;
    let roulette_id = match args.roulette_id {
        Some(id) => id,
        None => match settings.get(LAST_ROULETTE_KEY)?.and_then(|v| v.parse::<i64>().ok()) {
            Some(id) => id,
            None => msg_bail_anyhow!(Message::RouletteIdRequired),
        },
    };

    let display_spins = Config::read()?.display_spins();
    let blocks = Blocks::new()?;
    let animate = !is_debug_mode();

    let winner = spin_roulette(&blocks, roulette_id, &mut rand::thread_rng(), display_spins, |option| {
        if animate {
            print!("\r🎲 {:<40}", option.name);
            let _ = io::stdout().flush();
            thread::sleep(DISPLAY_SPIN_DELAY);
        }
    })?;
    if animate {
        println!();
    }

    settings.set(LAST_ROULETTE_KEY, &roulette_id.to_string())?;
    msg_success!(Message::RouletteWinner(winner.name.clone(), winner.id), true);

    if args.run {
        let execution = Executions::new()?.start(winner.id, None)?;
        return track(execution);
    }
    Ok(())
}

pub fn run(args: RunArgs) -> Result<()> {
    let mut executions = Executions::new()?;

    if let Some(execution_id) = args.abandon {
        executions.abandon(execution_id)?;
        msg_success!(Message::ExecutionAbandoned(execution_id));
        return Ok(());
    }

    let execution = match (args.block_id, args.event) {
        (_, Some(event_id)) => executions.start_from_event(event_id)?,
        (Some(block_id), None) => executions.start(block_id, None)?,
        (None, None) => msg_bail_anyhow!(Message::BlockIdRequired),
    };
    track(execution)
}

fn track(mut execution: ActiveExecution) -> Result<()> {
    let theme = ColorfulTheme::default();
    msg_print!(Message::ExecutionStarted(execution.block_name.clone()), true);

    if !execution.subtasks.is_empty() {
        let names: Vec<&str> = execution.subtasks.iter().map(|s| s.name.as_str()).collect();
        let done = MultiSelect::with_theme(&theme)
            .with_prompt(Message::PromptTickSubtasks.to_string())
            .items(&names)
            .interact()?;
        for index in done {
            execution.toggle(index)?;
        }

        let (completed, total) = execution.progress();
        msg_print!(Message::ExecutionProgress(completed, total));
    }

    let mut executions = Executions::new()?;
    let finish = Confirm::with_theme(&theme)
        .with_prompt(Message::ConfirmFinishExecution.to_string())
        .default(true)
        .interact()?;

    if finish {
        executions.finish(execution.execution_id, &execution.completion_list())?;
        if execution.is_all_done() {
            msg_success!(Message::ExecutionCompleted(execution.block_name));
        } else {
            msg_warning!(Message::ExecutionCompletedPartially(execution.block_name));
        }
        return Ok(());
    }

    let abandon = Confirm::with_theme(&theme)
        .with_prompt(Message::ConfirmAbandonExecution.to_string())
        .default(false)
        .interact()?;
    if abandon {
        executions.abandon(execution.execution_id)?;
        msg_info!(Message::ExecutionAbandoned(execution.execution_id));
    } else {
        msg_info!(Message::ExecutionLeftOpen(execution.execution_id));
    }
    Ok(())
}
