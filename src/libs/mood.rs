//! Mood scale and the statistics shown above the diary.

use crate::db::diary::DiaryEntry;
use crate::libs::error::{CoreError, CoreResult};
use crate::libs::messages::Message;
use chrono::Datelike;

pub const MIN_MOOD: u8 = 1;
pub const MAX_MOOD: u8 = 5;
pub const DEFAULT_STATS_WINDOW: usize = 7;

pub fn validate_mood(mood: u8) -> CoreResult<u8> {
    if (MIN_MOOD..=MAX_MOOD).contains(&mood) {
        Ok(mood)
    } else {
        Err(CoreError::validation(Message::MoodOutOfRange(mood)))
    }
}

pub fn mood_label(mood: u8) -> &'static str {
    match mood {
        1 => "Awful",
        2 => "Low",
        3 => "Okay",
        4 => "Good",
        5 => "Great",
        _ => "Unknown",
    }
}

/// One point of the mood chart, labelled with the day of the month.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodPoint {
    pub label: String,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodStats {
    pub average: f64,
    pub count: usize,
    pub points: Vec<MoodPoint>,
}

impl MoodStats {
    pub fn empty() -> Self {
        MoodStats {
            average: 0.0,
            count: 0,
            points: Vec::new(),
        }
    }
}

/// Statistics over the `window` most recent entries.
///
/// Input order does not matter. Points come out oldest first; the average
/// is rounded to one decimal.
pub fn compute_mood_stats(entries: &[DiaryEntry], window: usize) -> MoodStats {
    let mut recent: Vec<&DiaryEntry> = entries.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(window);

    if recent.is_empty() {
        return MoodStats::empty();
    }

    recent.reverse();
    let count = recent.len();
    let total: u32 = recent.iter().map(|e| e.mood as u32).sum();
    let average = (total as f64 / count as f64 * 10.0).round() / 10.0;

    MoodStats {
        average,
        count,
        points: recent
            .iter()
            .map(|e| MoodPoint {
                label: e.date.day().to_string(),
                value: e.mood,
            })
            .collect(),
    }
}
