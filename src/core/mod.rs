//! Core logger types and traits

pub mod config;
pub mod error;
pub mod fanout;
pub mod filter;
pub mod formatter;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod module_registry;
pub mod output;
pub mod sink;
pub mod timestamp;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use fanout::SinkFanout;
pub use filter::FilterEngine;
pub use formatter::RecordFormatter;
pub use log_level::{LevelSet, LogLevel};
pub use log_record::{LogRecord, WriteMode};
pub use logger::{EngineState, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use module_registry::ModuleRegistry;
pub use output::{OutputSet, OutputType};
pub use sink::Sink;
pub use timestamp::TimestampZone;
