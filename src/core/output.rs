//! Output destination switches

use serde::{Deserialize, Serialize};
use std::fmt;

/// A destination a formatted line can be written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputType {
    Console = 0,
    LogFile = 1,
    RemoteSink = 2,
    UserSink = 3,
}

impl OutputType {
    pub const ALL: [OutputType; 4] = [
        OutputType::Console,
        OutputType::LogFile,
        OutputType::RemoteSink,
        OutputType::UserSink,
    ];

    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputType::Console => "console",
            OutputType::LogFile => "log file",
            OutputType::RemoteSink => "remote sink",
            OutputType::UserSink => "user sink",
        };
        f.write_str(name)
    }
}

/// Set of active destinations
///
/// An empty set silences every destination while sinks, file handle and
/// the rest of the configuration stay in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<OutputType>", into = "Vec<OutputType>")]
pub struct OutputSet(u8);

impl OutputSet {
    #[must_use]
    pub const fn none() -> Self {
        OutputSet(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        OutputSet(0b1111)
    }

    #[must_use]
    pub const fn with(self, output: OutputType) -> Self {
        OutputSet(self.0 | output.bit())
    }

    #[inline]
    pub const fn contains(self, output: OutputType) -> bool {
        self.0 & output.bit() != 0
    }

    pub fn insert(&mut self, output: OutputType) {
        self.0 |= output.bit();
    }

    pub fn remove(&mut self, output: OutputType) {
        self.0 &= !output.bit();
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn iter(self) -> impl Iterator<Item = OutputType> {
        OutputType::ALL.into_iter().filter(move |output| self.contains(*output))
    }
}

/// Log file only
impl Default for OutputSet {
    fn default() -> Self {
        OutputSet::none().with(OutputType::LogFile)
    }
}

impl FromIterator<OutputType> for OutputSet {
    fn from_iter<I: IntoIterator<Item = OutputType>>(iter: I) -> Self {
        iter.into_iter().fold(OutputSet::none(), OutputSet::with)
    }
}

impl From<Vec<OutputType>> for OutputSet {
    fn from(outputs: Vec<OutputType>) -> Self {
        outputs.into_iter().collect()
    }
}

impl From<OutputSet> for Vec<OutputType> {
    fn from(set: OutputSet) -> Self {
        set.iter().collect()
    }
}
