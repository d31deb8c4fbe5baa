//! Results reported by the diagnostic send paths.

use std::io;

use thiserror::Error;

/// What happened to a message handed to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// A datagram of `bytes` bytes left through the transport. `truncated`
    /// is set when the text was cut to fit the message buffer.
    Sent { bytes: usize, truncated: bool },
    /// The level gate or the `None` marker dropped the message before
    /// formatting.
    Suppressed,
}

/// Transport failure surfaced by [`Session::try_log`] and
/// [`Session::try_raw_send`].
///
/// [`Session::try_log`]: super::Session::try_log
/// [`Session::try_raw_send`]: super::Session::try_raw_send
#[derive(Debug, Error)]
pub enum TransmitError {
    #[error("datagram send failed: {0}")]
    Io(#[from] io::Error),
    #[error("short datagram write: sent {sent} of {expected} bytes")]
    Short { sent: usize, expected: usize },
}
