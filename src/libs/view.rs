use crate::db::diary::DiaryEntry;
use crate::db::repair::OrphanReport;
use crate::db::tags::Tag;
use crate::libs::block::{BlockDetail, BlockSummary, BlockType};
use crate::libs::calendar::{AgendaItem, Holiday};
use crate::libs::execution::{HistoryEntry, SubtaskStatus};
use crate::libs::formatter::{format_date, format_datetime, format_duration, format_minutes, format_time};
use crate::libs::mood::{mood_label, MoodStats};
use anyhow::Result;
use prettytable::{row, Cell, Row, Table};
use rusqlite::types::Value;

pub struct View {}

impl View {
    pub fn blocks(blocks: &[BlockSummary]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "TYPE", "ITEMS", "TIME", "DESCRIPTION"]);
        for summary in blocks {
            let block = &summary.block;
            let time = match block.block_type {
                BlockType::Roulette => "-".to_string(),
                BlockType::Standard => format_minutes(block.estimated_minutes),
            };
            table.add_row(row![block.id, block.name, block.block_type, summary.item_count, time, block.description]);
        }
        table.printstd();

        Ok(())
    }

    pub fn block_detail(detail: &BlockDetail) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "ITEM", "TIME", "SUBTASKS"]);
        match detail.block.block_type {
            BlockType::Standard => {
                for subtask in &detail.subtasks {
                    table.add_row(row![subtask.id, subtask.name, "", ""]);
                }
            }
            BlockType::Roulette => {
                for option in &detail.options {
                    let subtasks: Vec<&str> = option.subtasks.iter().map(|s| s.name.as_str()).collect();
                    table.add_row(row![
                        option.block.id,
                        option.block.name,
                        format_minutes(option.block.estimated_minutes),
                        subtasks.join(", ")
                    ]);
                }
            }
        }
        table.printstd();

        Ok(())
    }

    pub fn history(history: &[HistoryEntry]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "BLOCK", "STARTED", "ENDED", "DURATION", "STATUS"]);
        for entry in history {
            table.add_row(row![
                entry.execution_id,
                entry.block_name,
                format_datetime(&entry.start_time),
                entry.end_time.as_ref().map(format_time).unwrap_or_else(|| "-".to_string()),
                entry.duration().as_ref().map(format_duration).unwrap_or_else(|| "-".to_string()),
                entry.status
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn subtask_statuses(statuses: &[SubtaskStatus]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["SUBTASK", "DONE"]);
        for status in statuses {
            table.add_row(row![status.subtask_name, if status.is_completed { "✓" } else { "✗" }]);
        }
        table.printstd();

        Ok(())
    }

    pub fn diary(entries: &[DiaryEntry]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["DATE", "MOOD", "NOTES"]);
        for entry in entries {
            table.add_row(row![
                format_date(&entry.date),
                format!("{} {}", entry.mood, mood_label(entry.mood)),
                entry.notes
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn mood_stats(stats: &MoodStats) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["DAY", "MOOD", ""]);
        for point in &stats.points {
            table.add_row(row![point.label, point.value, "█".repeat(point.value as usize)]);
        }
        table.add_row(row!["AVG", format!("{:.1}", stats.average), format!("{} entries", stats.count)]);
        table.printstd();

        Ok(())
    }

    pub fn tags(tags: &[Tag]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "ENTRIES"]);
        for tag in tags {
            table.add_row(row![tag.id, tag.name, tag.usage]);
        }
        table.printstd();

        Ok(())
    }

    pub fn agenda(items: &[AgendaItem]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TIME", "KIND", "TITLE", "BLOCK", "REMINDER"]);
        for item in items {
            match item {
                AgendaItem::Holiday(holiday) => {
                    let kind = holiday.holiday_type.clone().unwrap_or_else(|| "holiday".to_string());
                    table.add_row(row![holiday.id, "all day", kind, holiday.name, "", ""]);
                }
                AgendaItem::Event(event) => {
                    let reminder = if event.reminder > 0 {
                        format_minutes(event.reminder)
                    } else {
                        String::new()
                    };
                    table.add_row(row![
                        event.id,
                        event.time_range(),
                        event.event_type,
                        event.title,
                        event.assigned_block_id.map(|id| id.to_string()).unwrap_or_default(),
                        reminder
                    ]);
                }
            }
        }
        table.printstd();

        Ok(())
    }

    pub fn holidays(holidays: &[Holiday]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["DATE", "NAME", "TYPE"]);
        for holiday in holidays {
            table.add_row(row![format_date(&holiday.date), holiday.name, holiday.holiday_type.clone().unwrap_or_default()]);
        }
        table.printstd();

        Ok(())
    }

    pub fn migrations(history: &[(u32, String, String)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["VERSION", "NAME", "APPLIED"]);
        for (version, name, applied_at) in history {
            table.add_row(row![version, name, applied_at]);
        }
        table.printstd();

        Ok(())
    }

    pub fn orphans(report: &OrphanReport) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ROWS", "COUNT"]);
        table.add_row(row!["subtasks without block", report.subtasks]);
        table.add_row(row!["options without roulette", report.options]);
        table.add_row(row!["statuses without run", report.statuses]);
        table.printstd();

        Ok(())
    }

    /// Raw rows of an ad-hoc query, one column per value.
    pub fn rows(rows: &[Vec<Value>]) -> Result<()> {
        let mut table = Table::new();

        for values in rows {
            let cells = values.iter().map(|value| Cell::new(&value_text(value))).collect();
            table.add_row(Row::new(cells));
        }
        table.printstd();

        Ok(())
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Real(n) => n.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}
