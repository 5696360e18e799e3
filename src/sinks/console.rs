//! Console output

use crate::core::{LogLevel, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Writes finished lines to stdout, or to any writer given at construction
///
/// Coloring is keyed by the `[<level>]` token inside the line; a line
/// without a recognizable level token is written uncolored.
pub struct ConsoleSink {
    target: Box<dyn Write + Send>,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Console output redirected to `writer`
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            target: Box::new(writer),
        }
    }

    pub fn write_line(&mut self, text: &str, colorful: bool) -> Result<()> {
        let rendered = if colorful {
            colorize(text)
        } else {
            None
        };
        self.target
            .write_all(rendered.as_deref().unwrap_or(text).as_bytes())?;
        self.target.flush()?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.target.flush()?;
        Ok(())
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

/// Level named by the first `[...]` token of a formatted line
pub fn level_token(text: &str) -> Option<LogLevel> {
    let start = text.find('[')? + 1;
    let len = text[start..].find(']')?;
    LogLevel::ALL
        .into_iter()
        .find(|level| level.to_str() == &text[start..start + len])
}

/// Colored copy of `text`, or `None` when it should be written as is
#[cfg(feature = "console")]
fn colorize(text: &str) -> Option<String> {
    let level = level_token(text)?;
    // Keep the terminator outside the escape sequence
    let body = text.trim_end_matches(|c| c == '\r' || c == '\n');
    let terminator = &text[body.len()..];
    Some(format!("{}{}", body.color(level.color_code()), terminator))
}

#[cfg(not(feature = "console"))]
fn colorize(_text: &str) -> Option<String> {
    None
}
