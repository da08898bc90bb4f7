use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::error::{BookingError, BookingResult};

/// Wire format for show start times in view models and forms.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Long form shown on pages, e.g. "Tuesday May, 21, 2019 at 9:30PM".
const DISPLAY_START_TIME_FORMAT: &str = "%A %B, %-d, %Y at %-I:%M%p";

const ACCEPTED_START_TIME_FORMATS: [&str; 3] =
    [START_TIME_FORMAT, "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Shows split around a reference instant.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> Schedule<T> {
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

/// Wall-clock "now" used to decide past vs upcoming. Start times are stored
/// as submitted (naive local time), so the comparison is local too.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// A show is past iff it started strictly before `now`; a show starting
/// exactly at `now` is upcoming.
pub fn partition_by_start<T, I>(shows: I, now: NaiveDateTime) -> Schedule<T>
where
    I: IntoIterator<Item = (NaiveDateTime, T)>,
{
    let mut schedule = Schedule {
        past: Vec::new(),
        upcoming: Vec::new(),
    };

    for (start_time, show) in shows {
        if start_time < now {
            schedule.past.push(show);
        } else {
            schedule.upcoming.push(show);
        }
    }

    schedule
}

pub fn format_start_time(start_time: &NaiveDateTime) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

pub fn display_start_time(start_time: &NaiveDateTime) -> String {
    start_time.format(DISPLAY_START_TIME_FORMAT).to_string()
}

pub fn parse_start_time(raw: &str) -> BookingResult<NaiveDateTime> {
    let trimmed = raw.trim();
    ACCEPTED_START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| BookingError::InvalidStartTime(raw.to_string()))
}
