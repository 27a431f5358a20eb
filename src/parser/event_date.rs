//! Reads the free-text dates editors type into events ("15 March 2025",
//! "March 15-17, 2025", "2025-03-15", ...) well enough to tell upcoming
//! events from past ones.

use crate::domain::Event;
use chrono::{Datelike, Months, NaiveDate};
use derive_more::Display;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static ISO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:$|[T\s])").expect("valid ISO date regex")
});

static NUMERIC_DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[/.](\d{1,2})[/.](\d{4})\b").expect("valid numeric date regex")
});

// "15 March 2025", "15th - 17th of Mar. 2025"
static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?(?:\s*(?:-|–|to)\s*(\d{1,2})(?:st|nd|rd|th)?)?\s+(?:of\s+)?([a-z]+)\.?,?\s+(\d{4})\b",
    )
    .expect("valid day-first date regex")
});

// "March 15, 2025", "Mar 15-17 2025"
static MONTH_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:\s*(?:-|–|to)\s*(\d{1,2})(?:st|nd|rd|th)?)?,?\s+(\d{4})\b",
    )
    .expect("valid month-first date regex")
});

// "March 2025"
static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([a-z]+)\.?,?\s+(\d{4})\b").expect("valid month-year regex")
});

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// 1-based month number for a full or abbreviated (3+ letters) English month name.
fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|full| full.starts_with(&name))
        .map(|i| i as u32 + 1)
}

fn num<T: std::str::FromStr>(capture: Option<regex::Match<'_>>) -> Option<T> {
    capture?.as_str().parse().ok()
}

/// Parses an event date. Ranges resolve to their last day and a bare
/// month-year resolves to the last day of that month. `None` when nothing
/// date-like is found or the calendar date does not exist.
pub fn parse_event_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Some(caps) = ISO.captures(text) {
        return NaiveDate::from_ymd_opt(num(caps.get(1))?, num(caps.get(2))?, num(caps.get(3))?);
    }

    if let Some(caps) = NUMERIC_DAY_FIRST.captures(text) {
        return NaiveDate::from_ymd_opt(num(caps.get(3))?, num(caps.get(2))?, num(caps.get(1))?);
    }

    // the first structural match with a real month name decides, even if the day is invalid
    if let Some((day, month, year)) = DAY_FIRST.captures_iter(text).find_map(|caps| {
        let month = month_from_name(caps.get(3)?.as_str())?;
        let day: u32 = num(caps.get(2)).or_else(|| num(caps.get(1)))?;
        Some((day, month, num::<i32>(caps.get(4))?))
    }) {
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some((day, month, year)) = MONTH_FIRST.captures_iter(text).find_map(|caps| {
        let month = month_from_name(caps.get(1)?.as_str())?;
        let day: u32 = num(caps.get(3)).or_else(|| num(caps.get(2)))?;
        Some((day, month, num::<i32>(caps.get(4))?))
    }) {
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let (month, year) = MONTH_YEAR.captures_iter(text).find_map(|caps| {
        let month = month_from_name(caps.get(1)?.as_str())?;
        Some((month, num::<i32>(caps.get(2))?))
    })?;
    last_day_of_month(year, month)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTiming {
    #[display("upcoming")]
    Upcoming,
    #[display("past")]
    Past,
}

/// Past only when the parsed date is strictly before `today`. Events whose
/// date cannot be read stay listed as upcoming.
pub fn classify(text: &str, today: NaiveDate) -> EventTiming {
    match parse_event_date(text) {
        Some(date) if date < today => EventTiming::Past,
        _ => EventTiming::Upcoming,
    }
}

/// Upcoming events soonest first (unreadable dates last), past events most recent first.
pub fn split_events(events: &[Event], today: NaiveDate) -> (Vec<&Event>, Vec<&Event>) {
    let mut upcoming: Vec<(Option<NaiveDate>, &Event)> = Vec::new();
    let mut past: Vec<(NaiveDate, &Event)> = Vec::new();

    for event in events {
        match parse_event_date(&event.date) {
            Some(date) if date < today => past.push((date, event)),
            date => upcoming.push((date, event)),
        }
    }

    // stable sorts keep editor order for equal dates
    upcoming.sort_by_key(|(date, _)| (date.is_none(), date.map(|d| d.num_days_from_ce())));
    past.sort_by(|a, b| b.0.cmp(&a.0));

    (
        upcoming.into_iter().map(|(_, e)| e).collect(),
        past.into_iter().map(|(_, e)| e).collect(),
    )
}
