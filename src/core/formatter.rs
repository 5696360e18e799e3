//! Rendering of a [`LogRecord`] into its final line

use super::log_record::{LogRecord, WriteMode};
use super::timestamp::TimestampZone;
use std::fmt::Write as _;
use std::path::Path;

/// Default line terminator for [`WriteMode::Line`] records
pub const DEFAULT_LINE_TERMINATOR: &str = "\r\n";

/// Turns records into text
///
/// Terse lines look like `<ts> [<level>] [<module>]: <message>`; detail lines
/// insert `[<file>(line: <n>, method: <fn>, thread: <id>)]` before the colon.
#[derive(Debug, Clone)]
pub struct RecordFormatter {
    zone: TimestampZone,
    line_terminator: String,
}

impl Default for RecordFormatter {
    fn default() -> Self {
        Self::new(TimestampZone::default(), DEFAULT_LINE_TERMINATOR)
    }
}

impl RecordFormatter {
    pub fn new(zone: TimestampZone, line_terminator: impl Into<String>) -> Self {
        Self {
            zone,
            line_terminator: line_terminator.into(),
        }
    }

    pub fn zone(&self) -> TimestampZone {
        self.zone
    }

    pub fn line_terminator(&self) -> &str {
        &self.line_terminator
    }

    /// Format a record stamped with the current time
    pub fn format(&self, record: &LogRecord, module_name: &str, detail: bool) -> String {
        self.format_at(&self.zone.now(), record, module_name, detail)
    }

    /// Format a record with an explicit timestamp
    pub fn format_at(
        &self,
        timestamp: &str,
        record: &LogRecord,
        module_name: &str,
        detail: bool,
    ) -> String {
        let mut line = String::with_capacity(
            timestamp.len() + module_name.len() + record.message.len() + 64,
        );

        // Writing into a String cannot fail
        let _ = write!(line, "{} [{}] [{}]", timestamp, record.level, module_name);
        if detail {
            let _ = write!(
                line,
                " [{}(line: {}, method: {}, thread: {})]",
                basename(&record.file),
                record.line,
                record.function,
                record.thread_id
            );
        }
        line.push_str(": ");
        line.push_str(&record.message);

        if record.mode == WriteMode::Line {
            line.push_str(&self.line_terminator);
        }
        line
    }
}

/// Strip any directory prefix from a source path
pub fn basename(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;

    const TS: &str = "2024-05-01 08:00:00.125";

    #[test]
    fn test_terse_line() {
        let formatter = RecordFormatter::default();
        let record = LogRecord::new(LogLevel::Info, 0, "x=1");

        assert_eq!(
            formatter.format_at(TS, &record, "", false),
            "2024-05-01 08:00:00.125 [Info] []: x=1\r\n"
        );
    }

    #[test]
    fn test_detail_line() {
        let formatter = RecordFormatter::default();
        let mut record = LogRecord::new(LogLevel::Error, 2, "boom")
            .with_location("src/net/conn.rs", 88, "reconnect");
        record.thread_id = "12".to_string();

        assert_eq!(
            formatter.format_at(TS, &record, "net", true),
            "2024-05-01 08:00:00.125 [Error] [net] [conn.rs(line: 88, method: reconnect, thread: 12)]: boom\r\n"
        );
    }

    #[test]
    fn test_append_mode_has_no_terminator() {
        let formatter = RecordFormatter::new(TimestampZone::Utc, "\n");
        let record = LogRecord::new(LogLevel::Debug, 0, "partial").with_mode(WriteMode::Append);

        let line = formatter.format_at(TS, &record, "", false);
        assert!(line.ends_with("partial"));
    }

    #[test]
    fn test_custom_terminator() {
        let formatter = RecordFormatter::new(TimestampZone::Utc, "\n");
        let record = LogRecord::new(LogLevel::Warn, 0, "w");
        assert!(formatter.format_at(TS, &record, "", false).ends_with("w\n"));
    }

    #[test]
    fn test_live_timestamp_prefix() {
        let formatter = RecordFormatter::new(TimestampZone::Utc, "\r\n");
        let record = LogRecord::new(LogLevel::Info, 0, "now");
        let line = formatter.format(&record, "", false);

        assert!(crate::core::timestamp::leading_date(&line).is_some());
        assert_eq!(&line[23..], " [Info] []: now\r\n");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("src/core/logger.rs"), "logger.rs");
        assert_eq!(basename("logger.rs"), "logger.rs");
        assert_eq!(basename(""), "");
    }
}
