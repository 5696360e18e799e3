//! Log level definitions
//!
//! Levels are not a threshold: each one is an independent switch, so the
//! enabled levels are kept in a [`LevelSet`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "Debug",
            LogLevel::Info => "Info",
            LogLevel::Warn => "Warn",
            LogLevel::Error => "Error",
            LogLevel::Fatal => "Fatal",
        }
    }

    /// Bit occupied by this level inside a [`LevelSet`]
    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Set of enabled log levels
///
/// # Example
///
/// ```
/// use fanout_logger::{LevelSet, LogLevel};
///
/// let mut levels = LevelSet::none().with(LogLevel::Warn).with(LogLevel::Error);
/// assert!(levels.contains(LogLevel::Warn));
/// assert!(!levels.contains(LogLevel::Info));
///
/// levels.remove(LogLevel::Warn);
/// assert_eq!(levels.iter().collect::<Vec<_>>(), vec![LogLevel::Error]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<LogLevel>", into = "Vec<LogLevel>")]
pub struct LevelSet(u8);

impl LevelSet {
    #[must_use]
    pub const fn none() -> Self {
        LevelSet(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        LevelSet(0b1_1111)
    }

    #[must_use]
    pub const fn with(self, level: LogLevel) -> Self {
        LevelSet(self.0 | level.bit())
    }

    #[inline]
    pub const fn contains(self, level: LogLevel) -> bool {
        self.0 & level.bit() != 0
    }

    pub fn insert(&mut self, level: LogLevel) {
        self.0 |= level.bit();
    }

    pub fn remove(&mut self, level: LogLevel) {
        self.0 &= !level.bit();
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn iter(self) -> impl Iterator<Item = LogLevel> {
        LogLevel::ALL.into_iter().filter(move |level| self.contains(*level))
    }
}

/// Info, Warn, Error and Fatal
impl Default for LevelSet {
    fn default() -> Self {
        LevelSet::none()
            .with(LogLevel::Info)
            .with(LogLevel::Warn)
            .with(LogLevel::Error)
            .with(LogLevel::Fatal)
    }
}

impl FromIterator<LogLevel> for LevelSet {
    fn from_iter<I: IntoIterator<Item = LogLevel>>(iter: I) -> Self {
        iter.into_iter().fold(LevelSet::none(), LevelSet::with)
    }
}

impl From<Vec<LogLevel>> for LevelSet {
    fn from(levels: Vec<LogLevel>) -> Self {
        levels.into_iter().collect()
    }
}

impl From<LevelSet> for Vec<LogLevel> {
    fn from(set: LevelSet) -> Self {
        set.iter().collect()
    }
}
