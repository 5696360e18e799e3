//! Main logger implementation
//!
//! Producer threads gate, filter and format records on their own stack and
//! push the finished line onto an unbounded channel. A single worker thread
//! receives lines in FIFO order and hands each one to the [`SinkFanout`].
//!
//! Lifecycle is `Running -> Closing -> Closed`. Closing drops the sending
//! side of the channel; the worker drains every line already queued, sees
//! the disconnect and exits, after which the file is closed and the user and
//! remote sinks are notified.

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    fanout::SinkFanout,
    filter::FilterEngine,
    formatter::RecordFormatter,
    log_level::{LevelSet, LogLevel},
    log_record::{LogRecord, WriteMode},
    metrics::LoggerMetrics,
    module_registry::ModuleRegistry,
    output::{OutputSet, OutputType},
    sink::Sink,
    timestamp::TimestampZone,
};
use crate::sinks::{ConsoleSink, DailyFileSink};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Name given to the background writer thread
pub const WORKER_THREAD_NAME: &str = "fanout-logger-worker";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running = 0,
    Closing = 1,
    Closed = 2,
}

impl EngineState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => EngineState::Running,
            1 => EngineState::Closing,
            _ => EngineState::Closed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Switches {
    levels: LevelSet,
    detail_mode: bool,
}

pub struct Logger {
    switches: RwLock<Switches>,
    formatter: RecordFormatter,
    modules: ModuleRegistry,
    filters: FilterEngine,
    fanout: Arc<SinkFanout>,
    sender: RwLock<Option<Sender<String>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    state: AtomicU8,
    metrics: Arc<LoggerMetrics>,
    log_dir: PathBuf,
    file_name: String,
    idle_wait: Duration,
}

impl Logger {
    /// Create a logger and start its worker thread
    ///
    /// Never fails: if the log file cannot be opened the problem is
    /// reported once on stderr and the logger runs without file output.
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        Self::start(config, ConsoleSink::stdout(), false)
            .unwrap_or_else(|_| unreachable!("lenient start never returns an error"))
    }

    /// Create a logger, failing if the configuration is invalid, the log
    /// file cannot be opened or the worker thread cannot be spawned
    pub fn try_new(config: LoggerConfig) -> Result<Self> {
        Self::start(config, ConsoleSink::stdout(), true)
    }

    fn start(config: LoggerConfig, console: ConsoleSink, strict: bool) -> Result<Self> {
        if let Err(e) = config.validate() {
            if strict {
                return Err(e);
            }
            eprintln!("[LOGGER WARNING] {}", e);
        }

        let log_dir = config.log_dir();
        let file = match DailyFileSink::open(&log_dir, &config.file_name, config.timestamp_zone) {
            Ok(file) => Some(file),
            Err(e) if strict => return Err(e),
            Err(e) => {
                eprintln!("[LOGGER ERROR] {}. Logging continues without file output.", e);
                None
            }
        };

        let metrics = Arc::new(LoggerMetrics::new());
        let fanout = Arc::new(SinkFanout::new(
            config.outputs,
            config.colorful,
            console,
            file,
            Arc::clone(&metrics),
        ));

        let idle_wait = config.idle_wait();
        let (sender, receiver) = unbounded();
        let (sender, worker) =
            match Self::spawn_worker(receiver, Arc::clone(&fanout), idle_wait) {
                Ok(handle) => (Some(sender), Some(handle)),
                Err(e) if strict => return Err(e),
                Err(e) => {
                    eprintln!("[LOGGER CRITICAL] {}. Log records will be discarded.", e);
                    (None, None)
                }
            };

        let modules = ModuleRegistry::new();
        modules.add_all(config.modules);

        let filters = FilterEngine::new();
        filters.add_and_filters(config.and_filters);
        filters.add_or_filters(config.or_filters);
        filters.add_module_filters(config.module_filters);
        filters.set_reverse(config.reverse_filter);

        Ok(Self {
            switches: RwLock::new(Switches {
                levels: config.levels,
                detail_mode: config.detail_mode,
            }),
            formatter: RecordFormatter::new(config.timestamp_zone, config.line_terminator),
            modules,
            filters,
            fanout,
            sender: RwLock::new(sender),
            worker: Mutex::new(worker),
            state: AtomicU8::new(EngineState::Running as u8),
            metrics,
            log_dir,
            file_name: config.file_name,
            idle_wait,
        })
    }

    fn spawn_worker(
        receiver: Receiver<String>,
        fanout: Arc<SinkFanout>,
        idle_wait: Duration,
    ) -> Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                loop {
                    // Wakes as soon as a line is sent; the timeout only bounds idle sleeps
                    match receiver.recv_timeout(idle_wait) {
                        Ok(line) => fanout.dispatch(&line),
                        Err(RecvTimeoutError::Timeout) => continue,
                        // All senders gone and the channel is drained
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                // Sinks are released only after the last queued line
                fanout.close();
            })
            .map_err(|e| LoggerError::io_operation("spawning worker thread", WORKER_THREAD_NAME, e))
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Gate, filter, format and enqueue one record
    ///
    /// Never blocks on I/O and never reports an error to the caller.
    pub fn submit(&self, record: LogRecord) {
        if self.state() != EngineState::Running {
            self.metrics.record_rejected_after_close();
            return;
        }

        let detail_mode = {
            let switches = self.switches.read();
            if !switches.levels.contains(record.level) {
                self.metrics.record_level_suppressed();
                return;
            }
            switches.detail_mode
        };

        if self.filters.should_suppress(record.module, &record.message) {
            self.metrics.record_filter_suppressed();
            return;
        }

        let module_name = self.modules.name(record.module);
        let line = self.formatter.format(&record, &module_name, detail_mode);
        self.enqueue(line);
    }

    fn enqueue(&self, line: String) {
        let sender = self.sender.read();
        match sender.as_ref() {
            Some(tx) if tx.send(line).is_ok() => {
                self.metrics.record_enqueued();
            }
            _ => {
                self.metrics.record_rejected_after_close();
            }
        }
    }

    /// Continuation write: no line terminator is appended
    pub fn write(&self, level: LogLevel, module: i32, message: impl Into<String>) {
        self.submit(LogRecord::new(level, module, message).with_mode(WriteMode::Append));
    }

    /// Terminated write
    pub fn write_line(&self, level: LogLevel, module: i32, message: impl Into<String>) {
        self.submit(LogRecord::new(level, module, message));
    }

    #[inline]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.write_line(level, 0, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    // ------------------------------------------------------------------
    // Level switches
    // ------------------------------------------------------------------

    pub fn is_level_on(&self, level: LogLevel) -> bool {
        self.switches.read().levels.contains(level)
    }

    pub fn set_level_on(&self, level: LogLevel) {
        self.switches.write().levels.insert(level);
    }

    pub fn set_level_off(&self, level: LogLevel) {
        self.switches.write().levels.remove(level);
    }

    pub fn levels(&self) -> LevelSet {
        self.switches.read().levels
    }

    pub fn set_levels(&self, levels: LevelSet) {
        self.switches.write().levels = levels;
    }

    // ------------------------------------------------------------------
    // Output switches
    // ------------------------------------------------------------------

    pub fn outputs(&self) -> OutputSet {
        self.fanout.outputs()
    }

    pub fn is_output_on(&self, output: OutputType) -> bool {
        self.fanout.outputs().contains(output)
    }

    pub fn set_output_on(&self, output: OutputType) {
        self.fanout.set_output_on(output);
    }

    pub fn set_output_off(&self, output: OutputType) {
        self.fanout.set_output_off(output);
    }

    pub fn set_outputs(&self, outputs: OutputSet) {
        self.fanout.set_outputs(outputs);
    }

    /// Turn every destination off; sinks and the file stay attached
    pub fn disable_output(&self) {
        self.fanout.set_outputs(OutputSet::none());
    }

    // ------------------------------------------------------------------
    // Presentation
    // ------------------------------------------------------------------

    pub fn set_detail_mode(&self, enable: bool) {
        self.switches.write().detail_mode = enable;
    }

    pub fn detail_mode(&self) -> bool {
        self.switches.read().detail_mode
    }

    pub fn set_colorful(&self, enable: bool) {
        self.fanout.set_colorful(enable);
    }

    pub fn is_colorful(&self) -> bool {
        self.fanout.is_colorful()
    }

    pub fn timestamp_zone(&self) -> TimestampZone {
        self.formatter.zone()
    }

    // ------------------------------------------------------------------
    // Module registry
    // ------------------------------------------------------------------

    pub fn add_module(&self, module: i32, name: impl Into<String>) {
        self.modules.add(module, name);
    }

    pub fn add_modules<I, S>(&self, modules: I)
    where
        I: IntoIterator<Item = (i32, S)>,
        S: Into<String>,
    {
        self.modules.add_all(modules);
    }

    pub fn remove_module(&self, module: i32) {
        self.modules.remove(module);
    }

    pub fn clear_modules(&self) {
        self.modules.clear();
    }

    /// Registered name of `module`, empty if unknown
    pub fn module_name(&self, module: i32) -> String {
        self.modules.name(module)
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Shared filter rules; all mutators take `&self`
    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn add_and_filter(&self, filter: impl Into<String>) {
        self.filters.add_and_filter(filter);
    }

    pub fn clear_and_filter(&self, filter: &str) {
        self.filters.remove_and_filter(filter);
    }

    pub fn clear_and_filters(&self) {
        self.filters.clear_and_filters();
    }

    pub fn add_or_filter(&self, filter: impl Into<String>) {
        self.filters.add_or_filter(filter);
    }

    pub fn clear_or_filter(&self, filter: &str) {
        self.filters.remove_or_filter(filter);
    }

    pub fn clear_or_filters(&self) {
        self.filters.clear_or_filters();
    }

    pub fn add_module_filter(&self, module: i32) {
        self.filters.add_module_filter(module);
    }

    pub fn clear_module_filter(&self, module: i32) {
        self.filters.remove_module_filter(module);
    }

    pub fn clear_module_filters(&self) {
        self.filters.clear_module_filters();
    }

    pub fn clear_all_filters(&self) {
        self.filters.clear_all();
    }

    pub fn set_reverse_filter(&self, reverse: bool) {
        self.filters.set_reverse(reverse);
    }

    pub fn is_reverse_filter(&self) -> bool {
        self.filters.is_reverse()
    }

    // ------------------------------------------------------------------
    // Sinks
    // ------------------------------------------------------------------

    /// Attach the user sink; ignored once the logger is closing
    pub fn set_user_sink(&self, sink: Arc<dyn Sink>) {
        if self.state() == EngineState::Running {
            self.fanout.set_user_sink(sink);
        }
    }

    /// Attach the remote sink; ignored once the logger is closing
    pub fn set_remote_sink(&self, sink: Arc<dyn Sink>) {
        if self.state() == EngineState::Running {
            self.fanout.set_remote_sink(sink);
        }
    }

    /// Whether a log file is currently open
    pub fn has_log_file(&self) -> bool {
        self.fanout.has_log_file()
    }

    /// Directory holding the dated log files
    pub fn log_dir(&self) -> &std::path::Path {
        &self.log_dir
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Longest time the idle worker sleeps between wake-ups
    pub fn idle_wait(&self) -> Duration {
        self.idle_wait
    }

    // ------------------------------------------------------------------
    // Queue and lifecycle
    // ------------------------------------------------------------------

    /// No line waiting for the worker (one may still be in dispatch)
    pub fn is_queue_empty(&self) -> bool {
        self.sender.read().as_ref().map_or(true, Sender::is_empty)
    }

    pub fn pending_count(&self) -> usize {
        self.sender.read().as_ref().map_or(0, Sender::len)
    }

    pub fn state(&self) -> EngineState {
        EngineState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_closed(&self) -> bool {
        self.state() == EngineState::Closed
    }

    /// Get the logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use fanout_logger::{Logger, LoggerConfig, OutputSet};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let mut config = LoggerConfig::new(dir.path(), "doc.log");
    /// config.outputs = OutputSet::none();
    ///
    /// let logger = Logger::new(config);
    /// logger.debug("Debug is off by default");
    /// logger.info("Queued");
    /// logger.close();
    ///
    /// assert_eq!(logger.metrics().level_suppressed(), 1);
    /// assert_eq!(logger.metrics().dispatched(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Stop accepting records, drain the queue and release every sink
    ///
    /// Blocks until the worker has written out everything queued before the
    /// call. Idempotent: concurrent or repeated calls wait for the first one
    /// to finish and then return. There is no timeout; a sink that never
    /// returns keeps `close` waiting. Called from inside a sink, it returns
    /// at once and the worker finishes the drain on its own.
    pub fn close(&self) {
        let mut worker = self.worker.lock();
        if self.state() == EngineState::Closed {
            return;
        }
        self.state.store(EngineState::Closing as u8, Ordering::Release);

        // Disconnect the channel; the worker exits once it is drained
        drop(self.sender.write().take());

        match worker.take() {
            Some(handle) if handle.thread().id() == thread::current().id() => {
                // The worker drains the rest and releases the sinks on exit
                eprintln!("[LOGGER WARNING] close() called from a sink; not waiting for the worker");
            }
            Some(handle) => {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Worker thread panicked during shutdown: {:?}", e);
                }
                // No-op unless the worker died before reaching its exit path
                self.fanout.close();
            }
            None => self.fanout.close(),
        }

        self.state.store(EngineState::Closed as u8, Ordering::Release);
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use fanout_logger::prelude::*;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let logger = Logger::builder()
    ///     .base_dir(dir.path())
    ///     .file_name("service.log")
    ///     .level(LogLevel::Debug)
    ///     .output(OutputType::Console)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use fanout_logger::prelude::*;
///
/// let dir = tempfile::tempdir().unwrap();
/// let logger = Logger::builder()
///     .base_dir(dir.path())
///     .file_name("app.log")
///     .levels(LevelSet::all())
///     .detail_mode(false)
///     .module(1, "http")
///     .module_filter(9)
///     .build();
///
/// assert_eq!(logger.module_name(1), "http");
/// assert!(logger.is_level_on(LogLevel::Debug));
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    console: Option<ConsoleSink>,
    user_sink: Option<Arc<dyn Sink>>,
    remote_sink: Option<Arc<dyn Sink>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::from_config(LoggerConfig::default())
    }

    /// Start from an existing configuration
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            console: None,
            user_sink: None,
            remote_sink: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = dir.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    /// Replace the whole output set
    #[must_use = "builder methods return a new value"]
    pub fn outputs(mut self, outputs: OutputSet) -> Self {
        self.config.outputs = outputs;
        self
    }

    /// Enable one more output
    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, output: OutputType) -> Self {
        self.config.outputs.insert(output);
        self
    }

    /// Replace the whole level set
    #[must_use = "builder methods return a new value"]
    pub fn levels(mut self, levels: LevelSet) -> Self {
        self.config.levels = levels;
        self
    }

    /// Enable one more level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.levels.insert(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn detail_mode(mut self, enable: bool) -> Self {
        self.config.detail_mode = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colorful(mut self, enable: bool) -> Self {
        self.config.colorful = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn reverse_filter(mut self, enable: bool) -> Self {
        self.config.reverse_filter = enable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_zone(mut self, zone: TimestampZone) -> Self {
        self.config.timestamp_zone = zone;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.config.line_terminator = terminator.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn idle_wait(mut self, wait: Duration) -> Self {
        self.config.idle_wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX).max(1);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn module(mut self, module: i32, name: impl Into<String>) -> Self {
        self.config.modules.insert(module, name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn and_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.and_filters.push(filter.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn or_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.or_filters.push(filter.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn module_filter(mut self, module: i32) -> Self {
        self.config.module_filters.push(module);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn user_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.user_sink = Some(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn remote_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.remote_sink = Some(sink);
        self
    }

    /// Send console output to `writer` instead of stdout
    #[must_use = "builder methods return a new value"]
    pub fn console_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.console = Some(ConsoleSink::with_writer(writer));
        self
    }

    /// Build the Logger, degrading to no file output if the file cannot be opened
    pub fn build(self) -> Logger {
        let (config, console, user, remote) = self.into_parts();
        let logger = Logger::start(config, console, false)
            .unwrap_or_else(|_| unreachable!("lenient start never returns an error"));
        Self::attach(&logger, user, remote);
        logger
    }

    /// Build the Logger, failing on any setup problem
    pub fn try_build(self) -> Result<Logger> {
        let (config, console, user, remote) = self.into_parts();
        let logger = Logger::start(config, console, true)?;
        Self::attach(&logger, user, remote);
        Ok(logger)
    }

    #[allow(clippy::type_complexity)]
    fn into_parts(
        self,
    ) -> (
        LoggerConfig,
        ConsoleSink,
        Option<Arc<dyn Sink>>,
        Option<Arc<dyn Sink>>,
    ) {
        (
            self.config,
            self.console.unwrap_or_default(),
            self.user_sink,
            self.remote_sink,
        )
    }

    fn attach(logger: &Logger, user: Option<Arc<dyn Sink>>, remote: Option<Arc<dyn Sink>>) {
        if let Some(sink) = user {
            logger.set_user_sink(sink);
        }
        if let Some(sink) = remote {
            logger.set_remote_sink(sink);
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CollectingSink {
        lines: Mutex<Vec<String>>,
        closed: AtomicUsize,
    }

    impl Sink for CollectingSink {
        fn write(&self, text: &str) -> Result<()> {
            self.lines.lock().push(text.to_string());
            Ok(())
        }

        fn close(&self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &str {
            "collecting"
        }
    }

    fn user_only(dir: &std::path::Path) -> (Logger, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::default());
        let logger = Logger::builder()
            .base_dir(dir)
            .outputs(OutputSet::none().with(OutputType::UserSink))
            .levels(LevelSet::all())
            .detail_mode(false)
            .user_sink(sink.clone())
            .build();
        (logger, sink)
    }

    #[test]
    fn test_builder_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::builder().base_dir(dir.path()).build();

        assert_eq!(logger.outputs(), OutputSet::default());
        assert_eq!(logger.levels(), LevelSet::default());
        assert!(logger.detail_mode());
        assert!(logger.has_log_file());
        assert_eq!(logger.state(), EngineState::Running);
        assert_eq!(logger.log_dir(), dir.path().join("log"));
    }

    #[test]
    fn test_disabled_level_never_reaches_sink() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, sink) = user_only(dir.path());
        logger.set_level_off(LogLevel::Warn);

        logger.warn("hidden");
        logger.error("shown");
        logger.close();

        let lines = sink.lines.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("[Error] []: shown"));
        assert_eq!(logger.metrics().level_suppressed(), 1);
    }

    #[test]
    fn test_filtered_record_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, sink) = user_only(dir.path());
        logger.add_module_filter(5);

        logger.write_line(LogLevel::Info, 5, "from muted module");
        logger.write_line(LogLevel::Info, 6, "from other module");
        logger.close();

        assert_eq!(sink.lines.lock().len(), 1);
        assert_eq!(logger.metrics().filter_suppressed(), 1);
    }

    #[test]
    fn test_module_name_in_line() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, sink) = user_only(dir.path());
        logger.add_module(3, "db");

        logger.write_line(LogLevel::Info, 3, "connected");
        logger.write(LogLevel::Info, 4, "partial");
        logger.close();

        let lines = sink.lines.lock();
        assert!(lines[0].ends_with(" [Info] [db]: connected\r\n"));
        assert!(lines[1].ends_with(" [Info] []: partial"));
    }

    #[test]
    fn test_close_is_idempotent_and_closes_sink_once() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, sink) = user_only(dir.path());

        logger.info("before");
        logger.close();
        logger.close();
        logger.info("after");

        assert!(logger.is_closed());
        assert!(logger.is_queue_empty());
        assert_eq!(sink.lines.lock().len(), 1);
        assert_eq!(sink.closed.load(Ordering::SeqCst), 1);
        assert_eq!(logger.metrics().rejected_after_close(), 1);

        // Getters stay valid
        assert!(logger.is_output_on(OutputType::UserSink));
        drop(logger);
        assert_eq!(sink.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_sink_attached_after_close_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, _) = user_only(dir.path());
        logger.close();

        let late = Arc::new(CollectingSink::default());
        logger.set_remote_sink(late.clone());
        drop(logger);
        assert_eq!(late.closed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disable_output_keeps_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, sink) = user_only(dir.path());

        logger.disable_output();
        logger.info("silenced");
        logger.set_output_on(OutputType::UserSink);
        logger.info("audible");
        logger.close();

        let lines = sink.lines.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("audible"));
    }

    #[test]
    fn test_try_new_reports_unopenable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, "file, not dir").unwrap();

        let config = LoggerConfig::new(&blocker, "app.log");
        assert!(Logger::try_new(config.clone()).is_err());

        // Lenient constructor keeps running without a file
        let logger = Logger::new(config);
        assert!(!logger.has_log_file());
        logger.info("goes nowhere");
        logger.close();
        assert_eq!(logger.metrics().dispatched(), 1);
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig::new(dir.path(), "");
        assert!(matches!(
            Logger::try_new(config),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_lenient_start_never_uses_zero_idle_wait() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LoggerConfig::new(dir.path(), "app.log");
        config.idle_wait_ms = 0;

        let logger = Logger::new(config);
        assert_eq!(logger.idle_wait(), Duration::from_millis(1));

        logger.info("still delivered");
        logger.close();
        assert_eq!(logger.metrics().dispatched(), 1);
    }

    /// Sink that shuts its own logger down when it sees "stop"
    struct ClosingSink {
        logger: Mutex<Option<Arc<Logger>>>,
        gate: std::sync::Barrier,
        lines: Mutex<Vec<String>>,
        closed: AtomicUsize,
    }

    impl Sink for ClosingSink {
        fn write(&self, text: &str) -> Result<()> {
            self.lines.lock().push(text.to_string());
            if text.contains("stop") {
                self.gate.wait();
                if let Some(logger) = self.logger.lock().take() {
                    logger.close();
                }
            }
            Ok(())
        }

        fn close(&self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &str {
            "closing"
        }
    }

    #[test]
    fn test_close_from_sink_still_drains_queue() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(ClosingSink {
            logger: Mutex::new(None),
            gate: std::sync::Barrier::new(2),
            lines: Mutex::new(Vec::new()),
            closed: AtomicUsize::new(0),
        });
        let logger = Arc::new(
            Logger::builder()
                .base_dir(dir.path())
                .outputs(OutputSet::none().with(OutputType::UserSink))
                .detail_mode(false)
                .user_sink(sink.clone())
                .build(),
        );
        *sink.logger.lock() = Some(Arc::clone(&logger));

        logger.info("stop");
        logger.info("queued one");
        logger.info("queued two");
        // Both lines are in the queue before the sink closes the logger
        sink.gate.wait();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while sink.closed.load(Ordering::SeqCst) == 0 && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(sink.closed.load(Ordering::SeqCst), 1);
        assert!(logger.is_closed());
        let lines = sink.lines.lock();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with("]: queued two\r\n"));
        assert_eq!(logger.metrics().dispatched(), 3);
    }

    #[test]
    fn test_engine_state_from_u8() {
        assert_eq!(EngineState::from_u8(0), EngineState::Running);
        assert_eq!(EngineState::from_u8(1), EngineState::Closing);
        assert_eq!(EngineState::from_u8(2), EngineState::Closed);
    }
}
