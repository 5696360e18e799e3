//! Sink implementations

pub mod console;
pub mod network;
pub mod rotating_file;

pub use console::ConsoleSink;
pub use network::TcpSink;
pub use rotating_file::DailyFileSink;

pub use crate::core::Sink;
