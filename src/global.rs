//! Process-wide default session.
//!
//! Code that cannot thread a [`Session`] through its call graph uses the
//! functions here instead. They operate on a single lazily created
//! [`SharedSession`] over [`UdpTransport`]; every call takes its mutex, so
//! concurrent callers are serialised rather than racing on the config or the
//! formatting buffers.

use std::fmt;

use once_cell::sync::Lazy;

use crate::{
    bounded_buf::MessageBuf,
    config::{SessionConfig, SharedConfig},
    level::NetLevel,
    session::{Session, SharedSession},
    transport::UdpTransport,
};

static SESSION: Lazy<SharedSession<UdpTransport>> =
    Lazy::new(|| Session::new(UdpTransport::default()).into_shared());

/// Handle to the process-wide session.
pub fn session() -> SharedSession<UdpTransport> {
    SESSION.clone()
}

/// Run `f` with exclusive access to the process-wide session.
///
/// Logging from inside `f` through this module deadlocks; use the session
/// passed to `f` instead.
pub fn with_session<R>(f: impl FnOnce(&mut Session<UdpTransport>) -> R) -> R {
    let mut guard = SESSION.lock();
    f(&mut *guard)
}

/// See [`Session::create_config`].
pub fn create_conf() -> bool {
    with_session(Session::create_config)
}

/// See [`Session::init`].
pub fn init(server: &str, port: u16, level: NetLevel) -> bool {
    with_session(|s| s.init(server, port, level))
}

/// See [`Session::init_with_external_config`].
pub fn init_with_conf(conf: SharedConfig) -> bool {
    with_session(|s| s.init_with_external_config(conf))
}

/// See [`Session::config`].
pub fn get_conf() -> Option<SessionConfig> {
    with_session(|s| s.config())
}

/// See [`Session::set_config`].
pub fn set_conf(conf: Option<SharedConfig>) -> bool {
    with_session(|s| s.set_config(conf))
}

/// See [`Session::set_log_level`].
pub fn set_log_level(level: NetLevel) {
    with_session(|s| s.set_log_level(level));
}

/// See [`Session::shutdown`].
pub fn finish() {
    with_session(Session::shutdown);
}

/// See [`Session::log`].
///
/// `args` is rendered without the lock held, so values whose formatting
/// logs again do not deadlock.
pub fn log(level: NetLevel, args: fmt::Arguments<'_>) {
    if !with_session(|s| s.permits(level)) {
        return;
    }
    let message = MessageBuf::from_args(args);
    with_session(|s| s.log_message(level, &message));
}

/// See [`Session::raw_send`].
pub fn raw_send(args: fmt::Arguments<'_>) {
    let message = MessageBuf::from_args(args);
    with_session(|s| s.raw_send_message(&message));
}

/// Drop the process-wide config so tests start from a clean slate.
#[cfg(any(test, feature = "test-util"))]
pub fn reset_for_test() {
    with_session(|s| {
        s.shutdown();
        *s = Session::new(UdpTransport::default());
    });
}
