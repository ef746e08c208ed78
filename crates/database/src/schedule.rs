//! Availability and appointment rules.
//!
//! These checks are pure so the repository layer can run them on every
//! write path before touching the database.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{Availability, Weekday};
use crate::validation::{ValidationError, CLOSING_TIME, OPENING_TIME};

/// A proposed weekly window for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub day: Weekday,
    #[serde(default = "default_start")]
    pub start_time: NaiveTime,
    #[serde(default = "default_end")]
    pub end_time: NaiveTime,
}

fn default_start() -> NaiveTime {
    OPENING_TIME
}

fn default_end() -> NaiveTime {
    CLOSING_TIME
}

impl Window {
    /// Full business day on `day`.
    pub fn full_day(day: Weekday) -> Self {
        Self {
            day,
            start_time: OPENING_TIME,
            end_time: CLOSING_TIME,
        }
    }
}

/// Check a window stays within business hours and starts before it ends.
pub fn validate_window(window: &Window) -> Result<(), ValidationError> {
    if window.start_time < OPENING_TIME || window.end_time > CLOSING_TIME {
        return Err(ValidationError::OutsideBusinessHours);
    }

    if window.start_time >= window.end_time {
        return Err(ValidationError::StartNotBeforeEnd);
    }

    Ok(())
}

/// Working weekday of a calendar date, `None` at weekends.
pub fn weekday_of(date: NaiveDate) -> Option<Weekday> {
    Weekday::from_chrono(date.weekday())
}

/// Check an appointment request against the lawyer's window for that weekday.
///
/// `availability` is the lawyer's row for the date's weekday, if any. The
/// window is inclusive at both ends.
pub fn validate_appointment(
    date: NaiveDate,
    time: NaiveTime,
    today: NaiveDate,
    availability: Option<&Availability>,
) -> Result<(), ValidationError> {
    if date < today {
        return Err(ValidationError::PastDate);
    }

    let day_name = date.format("%A").to_string();
    let Some(day) = weekday_of(date) else {
        return Err(ValidationError::LawyerUnavailable(day_name));
    };

    let Some(avail) = availability.filter(|a| a.day == day) else {
        return Err(ValidationError::LawyerUnavailable(day_name));
    };

    if time < avail.start_time || time > avail.end_time {
        return Err(ValidationError::OutsideWindow {
            start: avail.start_time,
            end: avail.end_time,
        });
    }

    Ok(())
}
