use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Severity of a log message and, on a session, the most verbose level it
/// will transmit.
///
/// Levels are ordered by verbosity: `None < Info < Error < Debug`. A session
/// whose threshold is `Error` transmits `Info` and `Error` messages but drops
/// `Debug` ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NetLevel {
    /// Marker meaning "do not print". Never transmitted as a message level.
    None = 0,
    #[default]
    Info = 1,
    Error = 2,
    Debug = 3,
}

/// Returned when a string or number does not name a [`NetLevel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid log level: {0}")]
pub struct ParseLevelError(pub String);

impl NetLevel {
    /// Severity tag written between brackets on the wire.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            NetLevel::None => None,
            NetLevel::Info => Some("INFO"),
            NetLevel::Error => Some("ERROR"),
            NetLevel::Debug => Some("DEBUG"),
        }
    }

    /// Return `true` when a message at `message` passes this threshold.
    pub fn allows(self, message: NetLevel) -> bool {
        message <= self
    }
}

impl fmt::Display for NetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NetLevel::None => "NONE",
            NetLevel::Info => "INFO",
            NetLevel::Error => "ERROR",
            NetLevel::Debug => "DEBUG",
        };
        f.write_str(s)
    }
}

impl FromStr for NetLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(raw) = trimmed.parse::<u8>() {
            return Self::try_from(raw);
        }
        match trimmed.to_ascii_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "INFO" => Ok(Self::Info),
            "ERROR" => Ok(Self::Error),
            "DEBUG" => Ok(Self::Debug),
            _ => Err(ParseLevelError(s.to_owned())),
        }
    }
}

impl TryFrom<u8> for NetLevel {
    type Error = ParseLevelError;

    fn try_from(raw: u8) -> Result<Self, ParseLevelError> {
        match raw {
            0 => Ok(Self::None),
            1 => Ok(Self::Info),
            2 => Ok(Self::Error),
            3 => Ok(Self::Debug),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

impl From<NetLevel> for u8 {
    fn from(level: NetLevel) -> Self {
        level as u8
    }
}
