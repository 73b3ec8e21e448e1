//! Reading-related domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// Where an ebook sits on a user's readlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadlistStatus {
    WantToRead,
    Reading,
    Finished,
}

impl ReadlistStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WantToRead => "WANT_TO_READ",
            Self::Reading => "READING",
            Self::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for ReadlistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadlistStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WANT_TO_READ" => Ok(Self::WantToRead),
            "READING" => Ok(Self::Reading),
            "FINISHED" => Ok(Self::Finished),
            other => Err(UnknownVariant::new("ReadlistStatus", other)),
        }
    }
}

/// Reading progress is a percentage in `0.0..=100.0`.
pub const MAX_PROGRESS: f64 = 100.0;

/// Returns `true` if `progress` is a finite percentage within bounds.
pub fn is_valid_progress(progress: f64) -> bool {
    progress.is_finite() && (0.0..=MAX_PROGRESS).contains(&progress)
}
