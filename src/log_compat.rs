//! Compatibility bridge for the Rust `log` crate.
//!
//! This module provides `NetLogAdapter`, an implementation of `log::Log`
//! that forwards records from the `log` facade into a debugnet session.
//! [`install_global_logger`] installs an adapter over the process-wide
//! session as the global Rust logger.

use std::sync::OnceLock;

use log::{Metadata, Record};

use crate::{
    bounded_buf::MessageBuf,
    global, is_self_target,
    level::NetLevel,
    session::SharedSession,
    transport::{DatagramTransport, UdpTransport},
};

/// Adapter implementing the Rust `log::Log` trait.
///
/// Each record is rendered as `target: message` followed by a newline and
/// sent through the session's level gate. Rendering happens outside the
/// session lock, so a record whose arguments log again is still delivered.
pub struct NetLogAdapter<T: DatagramTransport = UdpTransport> {
    session: SharedSession<T>,
}

impl NetLogAdapter<UdpTransport> {
    /// Adapter over the process-wide session.
    pub fn global() -> Self {
        Self::new(global::session())
    }
}

impl<T: DatagramTransport> NetLogAdapter<T> {
    pub fn new(session: SharedSession<T>) -> Self {
        Self { session }
    }
}

impl From<log::Level> for NetLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error | log::Level::Warn => NetLevel::Error,
            log::Level::Info => NetLevel::Info,
            log::Level::Debug | log::Level::Trace => NetLevel::Debug,
        }
    }
}

impl<T: DatagramTransport> log::Log for NetLogAdapter<T> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        !is_self_target(metadata.target())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = NetLevel::from(record.level());
        if !self.session.lock().permits(level) {
            return;
        }
        // Render before locking: the record's arguments may log themselves.
        let message =
            MessageBuf::from_args(format_args!("{}: {}\n", record.target(), record.args()));
        self.session.lock().log_message(level, &message);
    }

    fn flush(&self) {}
}

static INSTALL_RESULT: OnceLock<bool> = OnceLock::new();

/// Install debugnet as the global Rust logger.
///
/// Returns `true` on success. When a different global logger is already set,
/// installation fails and `false` is returned. Subsequent calls return the
/// cached outcome.
pub fn install_global_logger() -> bool {
    *INSTALL_RESULT.get_or_init(|| {
        if log::set_boxed_logger(Box::new(NetLogAdapter::global())).is_err() {
            return false;
        }
        log::set_max_level(log::LevelFilter::Trace);
        true
    })
}
