//! Dispatch of one finished line to every enabled destination
//!
//! Destinations are visited in a fixed order: console, log file, user sink,
//! remote sink. Console and file share one write lock. User and remote
//! sinks are caller code, so they are invoked with no engine lock held, and
//! each call is isolated with `catch_unwind` so a panicking sink cannot take
//! the worker thread down.

use super::error::Result;
use super::metrics::LoggerMetrics;
use super::output::{OutputSet, OutputType};
use super::sink::Sink;
use crate::sinks::{ConsoleSink, DailyFileSink};
use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
struct Switches {
    outputs: OutputSet,
    colorful: bool,
}

/// Console and file, guarded by the dedicated write lock
struct LocalSinks {
    console: ConsoleSink,
    file: Option<DailyFileSink>,
}

pub struct SinkFanout {
    switches: RwLock<Switches>,
    local: Mutex<LocalSinks>,
    user_sink: RwLock<Option<Arc<dyn Sink>>>,
    remote_sink: RwLock<Option<Arc<dyn Sink>>>,
    metrics: Arc<LoggerMetrics>,
}

impl SinkFanout {
    pub fn new(
        outputs: OutputSet,
        colorful: bool,
        console: ConsoleSink,
        file: Option<DailyFileSink>,
        metrics: Arc<LoggerMetrics>,
    ) -> Self {
        Self {
            switches: RwLock::new(Switches { outputs, colorful }),
            local: Mutex::new(LocalSinks { console, file }),
            user_sink: RwLock::new(None),
            remote_sink: RwLock::new(None),
            metrics,
        }
    }

    /// Send one line to every enabled destination
    pub fn dispatch(&self, text: &str) {
        let switches = *self.switches.read();
        let outputs = switches.outputs;

        if outputs.contains(OutputType::Console) || outputs.contains(OutputType::LogFile) {
            let mut local = self.local.lock();
            if outputs.contains(OutputType::Console) {
                self.guarded("console", || local.console.write_line(text, switches.colorful));
            }
            if outputs.contains(OutputType::LogFile) {
                if let Some(file) = local.file.as_mut() {
                    self.guarded("log file", || file.write_line(text));
                }
            }
        }

        if outputs.contains(OutputType::UserSink) {
            // Clone the handle so the lock is released before calling out
            let sink = self.user_sink.read().clone();
            if let Some(sink) = sink {
                self.guarded(sink.name(), || sink.write(text));
            }
        }

        if outputs.contains(OutputType::RemoteSink) {
            let sink = self.remote_sink.read().clone();
            if let Some(sink) = sink {
                self.guarded(sink.name(), || sink.write(text));
            }
        }

        self.metrics.record_dispatched();
    }

    /// Run one sink call, reporting errors and panics on stderr
    fn guarded<F>(&self, target: &str, write: F)
    where
        F: FnOnce() -> Result<()>,
    {
        match catch_unwind(AssertUnwindSafe(write)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", target, e);
                self.metrics.record_sink_failure();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                     Other sinks continue to function.",
                    target, panic_msg
                );
                self.metrics.record_sink_failure();
            }
        }
    }

    /// Flush and close the file, then close user and remote sinks once
    pub fn close(&self) {
        {
            let mut local = self.local.lock();
            if let Err(e) = local.console.flush() {
                eprintln!("[LOGGER ERROR] Failed to flush console during shutdown: {}", e);
            }
            if let Some(mut file) = local.file.take() {
                if let Err(e) = file.close() {
                    eprintln!("[LOGGER ERROR] Failed to close log file during shutdown: {}", e);
                }
            }
        }

        let user = self.user_sink.write().take();
        let remote = self.remote_sink.write().take();
        for sink in [user, remote].into_iter().flatten() {
            let name = sink.name().to_string();
            if catch_unwind(AssertUnwindSafe(|| sink.close())).is_err() {
                eprintln!("[LOGGER CRITICAL] Sink '{}' panicked while closing", name);
            }
        }
    }

    pub fn outputs(&self) -> OutputSet {
        self.switches.read().outputs
    }

    pub fn set_output_on(&self, output: OutputType) {
        self.switches.write().outputs.insert(output);
    }

    pub fn set_output_off(&self, output: OutputType) {
        self.switches.write().outputs.remove(output);
    }

    pub fn set_outputs(&self, outputs: OutputSet) {
        self.switches.write().outputs = outputs;
    }

    pub fn is_colorful(&self) -> bool {
        self.switches.read().colorful
    }

    pub fn set_colorful(&self, colorful: bool) {
        self.switches.write().colorful = colorful;
    }

    /// Attach the user sink, replacing (without closing) any previous one
    pub fn set_user_sink(&self, sink: Arc<dyn Sink>) {
        *self.user_sink.write() = Some(sink);
    }

    /// Attach the remote sink, replacing (without closing) any previous one
    pub fn set_remote_sink(&self, sink: Arc<dyn Sink>) {
        *self.remote_sink.write() = Some(sink);
    }

    pub fn has_user_sink(&self) -> bool {
        self.user_sink.read().is_some()
    }

    pub fn has_remote_sink(&self) -> bool {
        self.remote_sink.read().is_some()
    }

    pub fn has_log_file(&self) -> bool {
        self.local.lock().file.is_some()
    }
}
