//! # Fanout Logger
//!
//! An in-process asynchronous logging engine. Any number of threads submit
//! records; one background worker writes them, in order, to the enabled
//! destinations.
//!
//! ## Features
//!
//! - **Non-blocking producers**: records are gated, filtered and formatted on
//!   the calling thread, then pushed onto an unbounded queue
//! - **Multiple sinks**: console (optionally colored), a date-rotated log
//!   file, a user sink and a remote sink, each switchable at runtime
//! - **Filtering**: per-level switches, module deny list, AND/OR substring
//!   rules and a reverse mode
//! - **Clean shutdown**: `close()` (or drop) drains every queued record
//!
//! ## Example
//!
//! ```
//! use fanout_logger::prelude::*;
//! use fanout_logger::info;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let logger = Logger::builder()
//!     .base_dir(dir.path())
//!     .file_name("service.log")
//!     .module(1, "http")
//!     .build();
//!
//! info!(logger, module = 1, "listening on port {}", 8080);
//! logger.close();
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        EngineState, LevelSet, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, OutputSet, OutputType, Result, Sink, TimestampZone,
        WriteMode,
    };
    pub use crate::sinks::TcpSink;
}

pub use crate::core::{
    EngineState, FilterEngine, LevelSet, LogLevel, LogRecord, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerMetrics, ModuleRegistry, OutputSet, OutputType,
    RecordFormatter, Result, Sink, TimestampZone, WriteMode,
};
pub use crate::sinks::{ConsoleSink, DailyFileSink, TcpSink};
