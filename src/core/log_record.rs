//! Log record structure

use super::log_level::LogLevel;
use std::cell::RefCell;

// Thread-local cache for the thread identifier to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Get the cached numeric identifier of the current thread
///
/// `ThreadId` only exposes its number through `Debug` (`ThreadId(7)`),
/// so the digits are extracted once per thread.
pub fn current_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let raw = format!("{:?}", std::thread::current().id());
                raw.chars().filter(char::is_ascii_digit).collect()
            })
            .clone()
    })
}

/// Whether a record ends its line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// No terminator; used for continuation writes
    Append,
    /// Terminated with the configured line terminator
    #[default]
    Line,
}

/// One log call, captured at the call site
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub module: i32,
    pub file: String,
    pub line: u32,
    pub function: String,
    pub thread_id: String,
    pub message: String,
    pub mode: WriteMode,
}

impl LogRecord {
    pub fn new(level: LogLevel, module: i32, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            file: String::new(),
            line: 0,
            function: String::new(),
            thread_id: current_thread_id(),
            message: message.into(),
            mode: WriteMode::Line,
        }
    }

    pub fn with_location(mut self, file: &str, line: u32, function: &str) -> Self {
        self.file = file.to_string();
        self.line = line;
        self.function = function.to_string();
        self
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_is_numeric_and_stable() {
        let first = current_thread_id();
        assert!(!first.is_empty());
        assert!(first.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(first, current_thread_id());

        let other = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_record_builder() {
        let record = LogRecord::new(LogLevel::Warn, 3, "disk almost full")
            .with_location("src/storage/disk.rs", 42, "check_space")
            .with_mode(WriteMode::Append);

        assert_eq!(record.module, 3);
        assert_eq!(record.line, 42);
        assert_eq!(record.function, "check_space");
        assert_eq!(record.mode, WriteMode::Append);
        assert_eq!(record.thread_id, current_thread_id());
    }
}
