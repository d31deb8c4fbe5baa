//! Fire-and-forget remote logging over UDP.
//!
//! `debugnet` formats leveled text messages and ships each one as a single
//! datagram to a listening host, for targets that have no local console.
//! A [`Session`] owns the lifecycle: `init` opens a socket to the host,
//! `log` gates, formats and sends, `shutdown` releases the socket. Sending
//! never fails loudly; a missing listener is indistinguishable from a
//! working one.
//!
//! ```rust,no_run
//! use debugnet::{NetLevel, Session};
//!
//! let mut session = Session::default().with_tag("PROSPERO");
//! session.init("192.168.1.20", 18194, NetLevel::Debug);
//! session.log(NetLevel::Info, format_args!("booted in {} ms\n", 412));
//! session.shutdown();
//! ```
//!
//! The [`global`] module keeps one session per process for code that cannot
//! pass a session around, and the `log-compat`/`tracing-compat` features
//! route the `log` and `tracing` ecosystems into it.

pub mod bounded_buf;
pub mod config;
pub mod global;
pub mod level;
#[cfg(feature = "log-compat")]
pub mod log_compat;
mod logging_macros;
pub mod rate_limited_warner;
pub mod session;
#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;
#[cfg(feature = "tracing-compat")]
pub mod tracing_compat;
pub mod transport;

pub use bounded_buf::{BoundedBuf, MESSAGE_CAPACITY, MessageBuf};
pub use config::{
    ConfigError, SessionConfig, SessionSettings, SharedConfig, TransportHandle,
};
pub use level::{NetLevel, ParseLevelError};
#[cfg(feature = "log-compat")]
pub use log_compat::{NetLogAdapter, install_global_logger};
pub use session::{Delivery, Session, SharedSession, TransmitError};
#[cfg(feature = "tracing-compat")]
pub use tracing_compat::NetTracingLayer;
pub use transport::{DatagramTransport, UdpTransport};

/// Log target prefix of the crate's own diagnostics.
pub const SELF_TARGET: &str = "debugnet";

/// `true` for targets emitted by this crate. The logging bridges drop these
/// so a failing transport cannot feed back into itself.
pub fn is_self_target(target: &str) -> bool {
    target
        .strip_prefix(SELF_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}
