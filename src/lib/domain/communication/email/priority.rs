//! Message priority

use std::{fmt, str::FromStr};

use thiserror::Error;

/// An unrecognised priority name or level
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown priority \"{0}\"")]
pub struct PriorityError(String);

/// The five ordered priority levels of a message, highest first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Level 1
    Highest = 1,
    /// Level 2
    High = 2,
    /// Level 3
    #[default]
    Normal = 3,
    /// Level 4
    Low = 4,
    /// Level 5
    Lowest = 5,
}

impl Priority {
    /// The lower-cased name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highest => "highest",
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
            Self::Lowest => "lowest",
        }
    }

    /// Map an `X-Priority` style level (1..=5) to a priority
    pub fn from_level(level: u8) -> Result<Self, PriorityError> {
        match level {
            1 => Ok(Self::Highest),
            2 => Ok(Self::High),
            3 => Ok(Self::Normal),
            4 => Ok(Self::Low),
            5 => Ok(Self::Lowest),
            other => Err(PriorityError(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = PriorityError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();

        if let Ok(level) = raw.parse::<u8>() {
            return Self::from_level(level);
        }

        match raw.to_ascii_lowercase().as_str() {
            "highest" => Ok(Self::Highest),
            "high" => Ok(Self::High),
            "normal" => Ok(Self::Normal),
            "low" => Ok(Self::Low),
            "lowest" => Ok(Self::Lowest),
            _ => Err(PriorityError(raw.to_string())),
        }
    }
}
