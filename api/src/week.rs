//! Season calendar: flattening ESPN's period/entry tree into selectable weeks.

use crate::espn::{EspnCalendarPeriod, EspnEvent};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRange {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeekRange {
    /// Both ends inclusive.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// "Week 1: 09/05 - 09/10"
    pub fn option_label(&self) -> String {
        format!(
            "{}: {} - {}",
            self.label,
            self.start.format("%m/%d"),
            self.end.format("%m/%d")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekOption {
    pub index: usize,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekSelection {
    pub options: Vec<WeekOption>,
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    MissingDate { label: String, field: &'static str },
    MalformedDate { label: String, value: String },
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::MissingDate { label, field } => {
                write!(f, "calendar entry {label:?} has no {field}")
            }
            CalendarError::MalformedDate { label, value } => {
                write!(f, "calendar entry {label:?} has malformed date {value:?}")
            }
        }
    }
}

impl std::error::Error for CalendarError {}

/// Ordered week ranges; a week's position is its identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    pub weeks: Vec<WeekRange>,
}

impl Calendar {
    /// Flatten every period's entries in order.
    ///
    /// A bad entry fails the whole calendar: dropping it would shift the index
    /// of every later week.
    pub fn from_periods(periods: &[EspnCalendarPeriod]) -> Result<Self, CalendarError> {
        let mut weeks = Vec::new();
        for entry in periods.iter().flat_map(|p| p.entries.iter().flatten()) {
            let label = entry.label.clone().unwrap_or_default();
            let start = required_date(&label, "startDate", entry.start_date.as_deref())?;
            let end = required_date(&label, "endDate", entry.end_date.as_deref())?;
            weeks.push(WeekRange { label, start, end });
        }
        Ok(Self { weeks })
    }

    pub fn get(&self, index: usize) -> Option<&WeekRange> {
        self.weeks.get(index)
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

fn required_date(
    label: &str,
    field: &'static str,
    value: Option<&str>,
) -> Result<DateTime<Utc>, CalendarError> {
    let value = value.ok_or_else(|| CalendarError::MissingDate {
        label: label.to_owned(),
        field,
    })?;
    parse_instant(value).ok_or_else(|| CalendarError::MalformedDate {
        label: label.to_owned(),
        value: value.to_owned(),
    })
}

/// Parse ESPN timestamps. RFC 3339 first, then the minute-precision
/// `2024-09-05T07:00Z` form ESPN uses for calendars and event dates.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = value.strip_suffix('Z').unwrap_or(value);
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| dt.and_utc())
}

/// One option per week and the week containing `now`, defaulting to the
/// first week when `now` is outside the season.
pub fn resolve(calendar: &Calendar, now: DateTime<Utc>) -> WeekSelection {
    let options = calendar
        .weeks
        .iter()
        .enumerate()
        .map(|(index, week)| WeekOption { index, label: week.option_label() })
        .collect::<Vec<_>>();

    let selected = calendar
        .weeks
        .iter()
        .position(|week| week.contains(now))
        .or_else(|| (!options.is_empty()).then_some(0));

    WeekSelection { options, selected }
}

/// Events dated inside `range`, in feed order. Undated events are left out.
pub fn games_in_week<'a>(events: &'a [EspnEvent], range: &WeekRange) -> Vec<&'a EspnEvent> {
    events
        .iter()
        .filter(|e| {
            e.date
                .as_deref()
                .and_then(parse_instant)
                .is_some_and(|d| range.contains(d))
        })
        .collect()
}
