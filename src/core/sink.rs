//! Sink trait for caller-supplied log destinations

use super::error::Result;

/// A destination for finished log lines
///
/// User and remote sinks are attached as `Arc<dyn Sink>` and are only ever
/// called from the logger's worker thread, one line at a time. `close` is
/// called exactly once on the sink attached when the logger shuts down. A
/// sink replaced earlier is released without `close`; its owner closes it.
///
/// # Example
///
/// ```
/// use fanout_logger::core::{Result, Sink};
/// use parking_lot::Mutex;
///
/// #[derive(Default)]
/// struct MemorySink {
///     lines: Mutex<Vec<String>>,
/// }
///
/// impl Sink for MemorySink {
///     fn write(&self, text: &str) -> Result<()> {
///         self.lines.lock().push(text.to_string());
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "memory"
///     }
/// }
/// ```
pub trait Sink: Send + Sync {
    /// Write one formatted line, terminator included when present
    fn write(&self, text: &str) -> Result<()>;

    /// Release resources; must not panic
    fn close(&self) {}

    fn name(&self) -> &str;
}
