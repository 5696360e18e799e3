//! TCP sink for remote logging
//!
//! Sends each finished line, unchanged, to a remote server over TCP.
//! Delivery is best effort: a failed write triggers one reconnect and one
//! resend, after which the line is reported as failed.

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Remote sink writing lines to a TCP endpoint
///
/// # Example
///
/// ```no_run
/// use fanout_logger::sinks::TcpSink;
/// use fanout_logger::prelude::*;
/// use std::sync::Arc;
///
/// let remote = TcpSink::connect("127.0.0.1:5140")
///     .expect("Failed to connect to log server");
///
/// let logger = Logger::builder()
///     .base_dir("/tmp/app")
///     .output(OutputType::RemoteSink)
///     .remote_sink(Arc::new(remote))
///     .build();
/// logger.info("This line is sent to 127.0.0.1:5140");
/// ```
pub struct TcpSink {
    stream: Mutex<Option<TcpStream>>,
    address: String,
    reconnect_on_error: bool,
}

impl TcpSink {
    /// Connect to `addr` (e.g. "localhost:5140")
    ///
    /// # Errors
    ///
    /// Returns error if connection fails
    pub fn connect(addr: impl Into<String>) -> Result<Self> {
        let address = addr.into();
        let stream = Self::open_stream(&address)?;

        Ok(Self {
            stream: Mutex::new(Some(stream)),
            address,
            reconnect_on_error: true,
        })
    }

    /// Enable or disable automatic reconnection on errors
    ///
    /// Default: enabled
    #[must_use]
    pub fn with_reconnect(mut self, enable: bool) -> Self {
        self.reconnect_on_error = enable;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_connected(&self) -> bool {
        self.stream.lock().is_some()
    }

    fn open_stream(address: &str) -> Result<TcpStream> {
        let stream = TcpStream::connect(address).map_err(|e| {
            LoggerError::io_operation("connecting to remote log server", address.to_string(), e)
        })?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

impl Sink for TcpSink {
    fn write(&self, text: &str) -> Result<()> {
        let mut guard = self.stream.lock();

        let result = match guard.as_mut() {
            Some(stream) => stream.write_all(text.as_bytes()),
            None if self.reconnect_on_error => Err(std::io::ErrorKind::NotConnected.into()),
            None => return Err(LoggerError::writer("Remote stream not connected")),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                *guard = None;
                if !self.reconnect_on_error {
                    return Err(LoggerError::io_operation(
                        "sending log line",
                        self.address.clone(),
                        e,
                    ));
                }

                let mut stream = Self::open_stream(&self.address)?;
                stream.write_all(text.as_bytes())?;
                *guard = Some(stream);
                Ok(())
            }
        }
    }

    fn close(&self) {
        if let Some(stream) = self.stream.lock().take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }

    fn name(&self) -> &str {
        "tcp"
    }
}
