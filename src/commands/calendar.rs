use crate::{
    commands::{date_arg, datetime_arg},
    db::calendar::Calendar,
    libs::{
        calendar::{AgendaItem, EventType, NewEvent},
        formatter::{format_date, format_datetime},
        messages::Message,
        view::View,
    },
    msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct CalendarArgs {
    #[command(subcommand)]
    command: CalendarCommand,
}

#[derive(Debug, Subcommand)]
enum CalendarCommand {
    /// Add an event or a task
    Add {
        title: String,
        /// Start (YYYY-MM-DD HH:MM)
        #[arg(short, long)]
        start: String,
        /// End (YYYY-MM-DD HH:MM)
        #[arg(short, long)]
        end: Option<String>,
        /// Record a task instead of an event
        #[arg(short, long)]
        task: bool,
        /// Reminder, in minutes before the start
        #[arg(short, long, default_value_t = 0)]
        reminder: u32,
        /// Block to run for this entry
        #[arg(short, long)]
        block: Option<i64>,
    },
    /// Delete an event
    Delete { id: i64 },
    /// Show one event
    Show { id: i64 },
    /// Holidays and events of a day
    Day {
        /// Date (YYYY-MM-DD), today by default
        date: Option<String>,
    },
    /// Manage holidays
    Holiday {
        #[command(subcommand)]
        command: HolidayCommand,
    },
}

#[derive(Debug, Subcommand)]
enum HolidayCommand {
    /// Register the holiday of a date, replacing any existing one
    Add {
        date: String,
        name: String,
        #[arg(short, long)]
        kind: Option<String>,
    },
    /// List registered holidays
    List,
    /// Remove the holiday of a date
    Delete { date: String },
}

pub fn cmd(args: CalendarArgs) -> Result<()> {
    match args.command {
        CalendarCommand::Add {
            title,
            start,
            end,
            task,
            reminder,
            block,
        } => {
            let event_type = if task { EventType::Task } else { EventType::Event };
            let mut event = NewEvent::new(event_type, &title, datetime_arg(&start)?).with_reminder(reminder);
            if let Some(end) = end {
                event = event.ending_at(datetime_arg(&end)?);
            }
            if let Some(block_id) = block {
                event = event.assigned_to(block_id);
            }

            let id = Calendar::new()?.create_event(&event)?;
            msg_success!(Message::EventCreated(title, id));
            Ok(())
        }
        CalendarCommand::Delete { id } => {
            Calendar::new()?.delete_event(id)?;
            msg_success!(Message::EventDeleted(id));
            Ok(())
        }
        CalendarCommand::Show { id } => {
            let event = Calendar::new()?
                .get_event(id)?
                .ok_or_else(|| msg_error_anyhow!(Message::EventNotFound(id)))?;
            msg_print!(Message::EventHeader(event.title.clone(), format_datetime(&event.start)), true);
            View::agenda(&[AgendaItem::Event(event)])
        }
        CalendarCommand::Day { date } => {
            let date = date_arg(date)?;
            let agenda = Calendar::new()?.day_agenda(date)?;
            if agenda.is_empty() {
                msg_info!(Message::NothingScheduled(format_date(&date)));
                return Ok(());
            }
            msg_print!(Message::AgendaHeader(format_date(&date)), true);
            View::agenda(&agenda)
        }
        CalendarCommand::Holiday { command } => handle_holiday(command),
    }
}

fn handle_holiday(command: HolidayCommand) -> Result<()> {
    let mut calendar = Calendar::new()?;
    match command {
        HolidayCommand::Add { date, name, kind } => {
            let date = date_arg(Some(date))?;
            calendar.upsert_holiday(date, &name, kind.as_deref())?;
            msg_success!(Message::HolidaySaved(name, format_date(&date)));
        }
        HolidayCommand::List => {
            let holidays = calendar.list_holidays()?;
            if holidays.is_empty() {
                msg_info!(Message::NoHolidays);
                return Ok(());
            }
            msg_print!(Message::HolidaysHeader, true);
            View::holidays(&holidays)?;
        }
        HolidayCommand::Delete { date } => {
            let date = date_arg(Some(date))?;
            calendar.delete_holiday(date)?;
            msg_success!(Message::HolidayDeleted(format_date(&date)));
        }
    }
    Ok(())
}
