//! Calendar domain types.

use crate::libs::error::{CoreError, CoreResult};
use crate::libs::formatter::format_time;
use crate::libs::messages::Message;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Event,
    Task,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Event => "event",
            EventType::Task => "task",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event" => Ok(EventType::Event),
            "task" => Ok(EventType::Task),
            other => Err(CoreError::validation(Message::UnknownEventType(other.to_string()))),
        }
    }
}

impl ToSql for EventType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EventType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e: CoreError| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: i64,
    pub event_type: EventType,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    /// Minutes before `start`; 0 means no reminder.
    pub reminder: u32,
    pub assigned_block_id: Option<i64>,
}

impl CalendarEvent {
    /// `09:00` or `09:00-10:30`.
    pub fn time_range(&self) -> String {
        match &self.end {
            Some(end) => format!("{}-{}", format_time(&self.start), format_time(end)),
            None => format_time(&self.start),
        }
    }
}

/// Input of `Calendar::create_event`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub event_type: EventType,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub reminder: u32,
    pub assigned_block_id: Option<i64>,
}

impl NewEvent {
    pub fn new(event_type: EventType, title: &str, start: NaiveDateTime) -> Self {
        NewEvent {
            event_type,
            title: title.to_string(),
            start,
            end: None,
            reminder: 0,
            assigned_block_id: None,
        }
    }

    pub fn ending_at(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_reminder(mut self, minutes: u32) -> Self {
        self.reminder = minutes;
        self
    }

    pub fn assigned_to(mut self, block_id: i64) -> Self {
        self.assigned_block_id = Some(block_id);
        self
    }

    /// Checks the fields that need no store lookup.
    pub fn validate(&self) -> CoreResult<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::validation(Message::EventTitleRequired));
        }
        if let Some(end) = &self.end {
            if *end < self.start {
                return Err(CoreError::validation(Message::EventEndsBeforeStart));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Holiday {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub holiday_type: Option<String>,
}

/// One line of a day view: holidays come before events.
#[derive(Debug, Clone, PartialEq)]
pub enum AgendaItem {
    Holiday(Holiday),
    Event(CalendarEvent),
}

impl AgendaItem {
    pub fn title(&self) -> &str {
        match self {
            AgendaItem::Holiday(holiday) => &holiday.name,
            AgendaItem::Event(event) => &event.title,
        }
    }
}
