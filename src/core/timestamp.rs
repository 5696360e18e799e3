//! Timestamp rendering
//!
//! Every line starts with `YYYY-MM-DD HH:MM:SS.mmm`. The date in front of
//! that prefix is also what the file sink uses to detect a day change.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Layout of the leading timestamp on every line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Layout of the date used in log file names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of a `YYYY-MM-DD` date
pub const DATE_LEN: usize = 10;

/// Time zone timestamps and file dates are computed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampZone {
    #[default]
    Local,
    Utc,
}

impl TimestampZone {
    /// Current time with millisecond precision
    ///
    /// # Examples
    ///
    /// ```
    /// use fanout_logger::core::TimestampZone;
    ///
    /// let now = TimestampZone::Utc.now();
    /// assert_eq!(now.len(), "2025-01-08 10:30:45.123".len());
    /// ```
    #[must_use]
    pub fn now(self) -> String {
        match self {
            TimestampZone::Local => Local::now().format(TIMESTAMP_FORMAT).to_string(),
            TimestampZone::Utc => Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Current date as used in log file names
    #[must_use]
    pub fn today(self) -> String {
        match self {
            TimestampZone::Local => Local::now().format(DATE_FORMAT).to_string(),
            TimestampZone::Utc => Utc::now().format(DATE_FORMAT).to_string(),
        }
    }

    /// Render a given instant, mainly for tests and replay
    #[must_use]
    pub fn format(self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampZone::Local => datetime
                .with_timezone(&Local)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            TimestampZone::Utc => datetime.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Extract the `YYYY-MM-DD` date a formatted line starts with
///
/// Returns `None` when the line does not begin with a valid date.
pub fn leading_date(line: &str) -> Option<&str> {
    let date = line.get(..DATE_LEN)?;
    chrono::NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    Some(date)
}
