//! Session state and the settings used to establish it.
//!
//! [`SessionConfig`] is the small record a session mutates over its
//! lifetime. [`SessionSettings`] carries the constructor-style inputs (peer
//! address, port, initial level and product tag) and can be loaded from the
//! `[debugnet]` section of an INI file.

use std::{fmt, fs, io, path::Path, sync::Arc, time::Duration};

use ini::Ini;
use parking_lot::Mutex;
use thiserror::Error;

use crate::level::NetLevel;

/// Product tag written before the severity on every tagged datagram.
pub const DEFAULT_TAG: &str = "DEBUGNET";
/// Default minimum gap between diagnostics about dropped datagrams.
pub const DEFAULT_WARN_INTERVAL: Duration = Duration::from_secs(5);
/// INI section read by [`SessionSettings::from_ini_str`].
pub const INI_SECTION: &str = "debugnet";

/// Opaque identifier of an open datagram socket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransportHandle(i32);

impl TransportHandle {
    /// Sentinel meaning "no handle".
    pub const INVALID: Self = Self(-1);

    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> i32 {
        self.0
    }

    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl Default for TransportHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for TransportHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a logging session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Whether `handle` refers to a live transport.
    pub initialized: bool,
    pub handle: TransportHandle,
    /// Most verbose message level that will be transmitted.
    pub log_level: NetLevel,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initialized: false,
            handle: TransportHandle::INVALID,
            log_level: NetLevel::Info,
        }
    }
}

impl SessionConfig {
    /// Wrap the config so another subsystem can hand it to a session.
    pub fn into_shared(self) -> SharedConfig {
        Arc::new(Mutex::new(self))
    }
}

/// Config owned outside the session and lent to it by reference.
pub type SharedConfig = Arc<Mutex<SessionConfig>>;

/// Errors raised while loading [`SessionSettings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{0} is an empty file")]
    EmptyFile(String),
    #[error("invalid ini: {0}")]
    Parse(#[from] ini::ParseError),
    #[error("missing [{0}] section")]
    MissingSection(&'static str),
    #[error("missing required key `{0}`")]
    MissingKey(&'static str),
    #[error("invalid value {value:?} for `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Inputs used to bring a session up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    /// Listening host, as a dotted quad, IPv6 literal or host name.
    pub server: String,
    pub port: u16,
    pub level: NetLevel,
    pub tag: String,
    pub warn_interval: Duration,
}

impl SessionSettings {
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            port,
            level: NetLevel::Info,
            tag: DEFAULT_TAG.to_owned(),
            warn_interval: DEFAULT_WARN_INTERVAL,
        }
    }

    pub fn with_level(mut self, level: NetLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_warn_interval(mut self, interval: Duration) -> Self {
        self.warn_interval = interval;
        self
    }

    /// Parse settings from the `[debugnet]` section of INI text.
    ///
    /// `server` and `port` are required; `level`, `tag` and
    /// `warn_interval_secs` fall back to their defaults.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text)?;
        let section = ini
            .section(Some(INI_SECTION))
            .ok_or(ConfigError::MissingSection(INI_SECTION))?;

        let server = section
            .get("server")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingKey("server"))?;
        let port = section
            .get("port")
            .ok_or(ConfigError::MissingKey("port"))
            .and_then(|raw| parse_value("port", raw))?;

        let mut settings = Self::new(server, port);
        if let Some(raw) = section.get("level") {
            settings.level = parse_value("level", raw)?;
        }
        if let Some(tag) = section.get("tag") {
            settings.tag = tag.trim().to_owned();
        }
        if let Some(raw) = section.get("warn_interval_secs") {
            settings.warn_interval = Duration::from_secs(parse_value("warn_interval_secs", raw)?);
        }
        Ok(settings)
    }

    /// Read and parse an INI file. See [`SessionSettings::from_ini_str`].
    pub fn from_ini_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if text.trim().is_empty() {
            return Err(ConfigError::EmptyFile(path.display().to_string()));
        }
        Self::from_ini_str(&text)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_owned(),
    })
}
