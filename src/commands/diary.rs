use crate::{
    commands::date_arg,
    db::{diary::Diary, tags::Tags},
    libs::{
        config::Config,
        formatter::format_date,
        messages::Message,
        mood::{compute_mood_stats, mood_label, MAX_MOOD, MIN_MOOD},
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

#[derive(Debug, Args)]
pub struct DiaryArgs {
    #[command(subcommand)]
    command: DiaryCommand,
}

#[derive(Debug, Subcommand)]
enum DiaryCommand {
    /// Write or rewrite the entry of a day
    Write {
        /// Date (YYYY-MM-DD), today by default
        #[arg(short, long)]
        date: Option<String>,
        /// Mood from 1 (awful) to 5 (great)
        #[arg(short, long)]
        mood: Option<u8>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List entries, newest first
    List {
        /// Only entries carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Mood statistics of the most recent entries
    Stats {
        #[arg(short, long)]
        window: Option<usize>,
    },
    /// Delete the entry of a day
    Delete { date: String },
    /// Attach a tag to the entry of a day
    Tag { date: String, tag: String },
    /// Remove a tag from the entry of a day
    Untag { date: String, tag: String },
    /// List tags with usage counts
    Tags,
}

pub fn cmd(args: DiaryArgs) -> Result<()> {
    match args.command {
        DiaryCommand::Write { date, mood, notes } => handle_write(date, mood, notes),
        DiaryCommand::List { tag } => handle_list(tag),
        DiaryCommand::Stats { window } => handle_stats(window),
        DiaryCommand::Delete { date } => handle_delete(date),
        DiaryCommand::Tag { date, tag } => {
            let date = date_arg(Some(date))?;
            Tags::new()?.tag_entry(date, &tag)?;
            msg_success!(Message::EntryTagged(format_date(&date), tag));
            Ok(())
        }
        DiaryCommand::Untag { date, tag } => {
            let date = date_arg(Some(date))?;
            if Tags::new()?.untag_entry(date, &tag)? {
                msg_success!(Message::EntryUntagged(format_date(&date), tag));
            } else {
                msg_info!(Message::EntryNotTagged(format_date(&date), tag));
            }
            Ok(())
        }
        DiaryCommand::Tags => {
            let tags = Tags::new()?.list_tags()?;
            if tags.is_empty() {
                msg_info!(Message::NoTagsFound);
                return Ok(());
            }
            msg_print!(Message::TagListHeader, true);
            View::tags(&tags)
        }
    }
}

fn handle_write(date: Option<String>, mood: Option<u8>, notes: Option<String>) -> Result<()> {
    let theme = ColorfulTheme::default();
    let date = date_arg(date)?;
    let mut diary = Diary::new()?;
    let existing = diary.get(date)?;

    let mood = match mood {
        Some(mood) => mood,
        None => {
            let moods: Vec<String> = (MIN_MOOD..=MAX_MOOD).map(|m| format!("{} {}", m, mood_label(m))).collect();
            let default = existing.as_ref().map(|e| (e.mood - MIN_MOOD) as usize).unwrap_or(2);
            let selection = Select::with_theme(&theme)
                .with_prompt(Message::PromptMood.to_string())
                .items(&moods)
                .default(default)
                .interact()?;
            MIN_MOOD + selection as u8
        }
    };

    let notes = match notes {
        Some(notes) => notes,
        None => Input::with_theme(&theme)
            .with_prompt(Message::PromptNotes.to_string())
            .default(existing.map(|e| e.notes).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?,
    };

    diary.upsert(date, mood, &notes)?;
    msg_success!(Message::DiaryEntrySaved(format_date(&date)));
    Ok(())
}

fn handle_list(tag: Option<String>) -> Result<()> {
    let entries = match &tag {
        Some(tag) => Tags::new()?.entries_with_tag(tag)?,
        None => Diary::new()?.list()?,
    };

    if entries.is_empty() {
        msg_info!(Message::NoDiaryEntries);
        return Ok(());
    }

    msg_print!(Message::DiaryHeader, true);
    View::diary(&entries)
}

fn handle_stats(window: Option<usize>) -> Result<()> {
    let window = match window {
        Some(window) => window,
        None => Config::read()?.stats_window(),
    };
    let entries = Diary::new()?.list()?;
    let stats = compute_mood_stats(&entries, window);

    if stats.count == 0 {
        msg_info!(Message::NoDiaryEntries);
        return Ok(());
    }

    msg_print!(Message::MoodStatsHeader(stats.count), true);
    View::mood_stats(&stats)
}

fn handle_delete(date: String) -> Result<()> {
    let date = date_arg(Some(date))?;
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::ConfirmDeleteEntry(format_date(&date)).to_string())
        .default(false)
        .interact()?;

    if !confirmed {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }

    Diary::new()?.delete(date)?;
    msg_success!(Message::DiaryEntryDeleted(format_date(&date)));
    Ok(())
}
