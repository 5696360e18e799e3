//! Date-rotated log file
//!
//! The active file is always `<dir>/<YYYY-MM-DD>_<base_name>`. Rotation is
//! lazy: the date a line starts with is compared against the date of the
//! open file, and the first line carrying a new date closes the old file
//! and opens the new one before being written.

use crate::core::error::{LoggerError, Result};
use crate::core::timestamp::{leading_date, TimestampZone};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct DailyFileSink {
    dir: PathBuf,
    base_name: String,
    current_date: String,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl DailyFileSink {
    /// Open today's file in `dir`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or the file opened
    pub fn open(dir: impl AsRef<Path>, base_name: &str, zone: TimestampZone) -> Result<Self> {
        Self::open_for_date(dir, base_name, &zone.today())
    }

    /// Open the file for an explicit `YYYY-MM-DD` date
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or the file opened
    pub fn open_for_date(dir: impl AsRef<Path>, base_name: &str, date: &str) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        fs::create_dir_all(&dir).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", dir.display()),
                e,
            )
        })?;

        let path = Self::file_path(&dir, base_name, date);
        let file = Self::open_append(&path)?;

        Ok(Self {
            dir,
            base_name: base_name.to_string(),
            current_date: date.to_string(),
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    /// `<dir>/<date>_<base_name>`
    pub fn file_path(dir: &Path, base_name: &str, date: &str) -> PathBuf {
        dir.join(format!("{}_{}", date, base_name))
    }

    fn open_append(path: &Path) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
            })
    }

    /// Write one line, rotating first if it carries a later date
    ///
    /// Lines stamped before the current date (queued just before midnight)
    /// go to the current file. The file is flushed after every line.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        if let Some(date) = leading_date(text) {
            // `YYYY-MM-DD` orders lexically
            if date > self.current_date.as_str() {
                if let Err(e) = self.rotate(date) {
                    // Keep writing to whatever is open; the next line retries
                    eprintln!("[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.", e);
                }
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Log file is closed"))?;

        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| {
                LoggerError::file_sink(
                    self.path.display().to_string(),
                    format!("Failed to write log line: {}", e),
                )
            })
    }

    fn rotate(&mut self, date: &str) -> Result<()> {
        if let Some(mut old) = self.writer.take() {
            let _ = old.flush();
        }

        let new_path = Self::file_path(&self.dir, &self.base_name, date);
        match Self::open_append(&new_path) {
            Ok(file) => {
                self.writer = Some(BufWriter::new(file));
                self.path = new_path;
                self.current_date = date.to_string();
                Ok(())
            }
            Err(e) => {
                // Reopen the previous day's file so lines are not lost
                if let Ok(file) = Self::open_append(&self.path) {
                    self.writer = Some(BufWriter::new(file));
                }
                Err(LoggerError::file_rotation(
                    new_path.display().to_string(),
                    e.to_string(),
                ))
            }
        }
    }

    /// Flush and release the file handle
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_sink(
                    self.path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Path of the file currently written to
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current_date(&self) -> &str {
        &self.current_date
    }
}

impl Drop for DailyFileSink {
    fn drop(&mut self) {
        // Best effort flush - ignore errors during drop
        let _ = self.close();
    }
}
