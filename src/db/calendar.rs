//! Calendar store: events and tasks on a timeline plus registered holidays.
//!
//! An event may point at a block through `assigned_block_id`. The column is
//! not a foreign key; the block manager clears it when the block goes away.

use crate::db::db::Db;
use crate::libs::calendar::{AgendaItem, CalendarEvent, Holiday, NewEvent};
use crate::libs::error::{CoreError, CoreResult};
use crate::libs::formatter::{format_date, format_datetime};
use crate::libs::messages::Message;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const EVENT_COLUMNS: &str = "id, type, title, start_datetime, end_datetime, reminder, assigned_block_id";
const INSERT_EVENT: &str = "
    INSERT INTO calendar_events (type, title, start_datetime, end_datetime, reminder, assigned_block_id)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";
const DELETE_EVENT: &str = "DELETE FROM calendar_events WHERE id = ?1";
const BLOCK_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM blocks WHERE id = ?1)";
const UPSERT_HOLIDAY: &str = "
    INSERT INTO holidays (date, name, type) VALUES (?1, ?2, ?3)
    ON CONFLICT(date) DO UPDATE SET name = excluded.name, type = excluded.type
    RETURNING id
";
const DELETE_HOLIDAY: &str = "DELETE FROM holidays WHERE date = ?1";
const SELECT_HOLIDAYS: &str = "SELECT id, date, name, type FROM holidays ORDER BY date";
const SELECT_HOLIDAYS_BY_DATE: &str = "SELECT id, date, name, type FROM holidays WHERE date = ?1 ORDER BY id";

pub struct Calendar {
    conn: Connection,
}

impl Calendar {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn from_db(db: Db) -> Self {
        Calendar { conn: db.into_connection() }
    }

    pub fn create_event(&mut self, event: &NewEvent) -> CoreResult<i64> {
        event.validate()?;

        if let Some(block_id) = event.assigned_block_id {
            let exists: bool = self.conn.query_row(BLOCK_EXISTS, params![block_id], |row| row.get(0))?;
            if !exists {
                return Err(CoreError::validation(Message::AssignedBlockMissing(block_id)));
            }
        }

        self.conn.execute(
            INSERT_EVENT,
            params![
                event.event_type,
                event.title.trim(),
                format_datetime(&event.start),
                event.end.as_ref().map(format_datetime),
                event.reminder,
                event.assigned_block_id
            ],
        )?;
        let id = self.conn.last_insert_rowid();

        tracing::info!(event_id = id, event_type = %event.event_type, "calendar event created");
        Ok(id)
    }

    pub fn delete_event(&mut self, id: i64) -> CoreResult<()> {
        let removed = self.conn.execute(DELETE_EVENT, params![id])?;
        if removed == 0 {
            return Err(CoreError::not_found("event", id));
        }
        Ok(())
    }

    pub fn get_event(&self, id: i64) -> CoreResult<Option<CalendarEvent>> {
        let sql = format!("SELECT {} FROM calendar_events WHERE id = ?1", EVENT_COLUMNS);
        let event = self.conn.query_row(&sql, params![id], event_from_row).optional()?;
        Ok(event)
    }

    /// Events starting on `date`, by start time.
    pub fn list_events_for_date(&self, date: NaiveDate) -> CoreResult<Vec<CalendarEvent>> {
        let sql = format!(
            "SELECT {} FROM calendar_events WHERE date(start_datetime) = ?1 ORDER BY start_datetime, id",
            EVENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt
            .query_map(params![format_date(&date)], event_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    pub fn list_holidays(&self) -> CoreResult<Vec<Holiday>> {
        let mut stmt = self.conn.prepare(SELECT_HOLIDAYS)?;
        let holidays = stmt.query_map([], holiday_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(holidays)
    }

    /// Registers the holiday of `date`, replacing the one already there.
    pub fn upsert_holiday(&mut self, date: NaiveDate, name: &str, holiday_type: Option<&str>) -> CoreResult<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation(Message::HolidayNameRequired));
        }

        let id: i64 = self
            .conn
            .query_row(UPSERT_HOLIDAY, params![format_date(&date), name, holiday_type], |row| row.get(0))?;
        Ok(id)
    }

    pub fn delete_holiday(&mut self, date: NaiveDate) -> CoreResult<()> {
        let removed = self.conn.execute(DELETE_HOLIDAY, params![format_date(&date)])?;
        if removed == 0 {
            return Err(CoreError::not_found("holiday", date));
        }
        Ok(())
    }

    /// Holidays of the day followed by its events in start order.
    pub fn day_agenda(&self, date: NaiveDate) -> CoreResult<Vec<AgendaItem>> {
        let mut stmt = self.conn.prepare(SELECT_HOLIDAYS_BY_DATE)?;
        let mut agenda = stmt
            .query_map(params![format_date(&date)], holiday_from_row)?
            .map(|holiday| holiday.map(AgendaItem::Holiday))
            .collect::<Result<Vec<_>, _>>()?;

        agenda.extend(self.list_events_for_date(date)?.into_iter().map(AgendaItem::Event));
        Ok(agenda)
    }
}

fn event_from_row(row: &Row) -> rusqlite::Result<CalendarEvent> {
    Ok(CalendarEvent {
        id: row.get(0)?,
        event_type: row.get(1)?,
        title: row.get(2)?,
        start: row.get(3)?,
        end: row.get(4)?,
        reminder: row.get(5)?,
        assigned_block_id: row.get(6)?,
    })
}

fn holiday_from_row(row: &Row) -> rusqlite::Result<Holiday> {
    Ok(Holiday {
        id: row.get(0)?,
        date: row.get(1)?,
        name: row.get(2)?,
        holiday_type: row.get(3)?,
    })
}
