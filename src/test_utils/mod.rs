//! Helpers shared by unit tests, integration tests and benches.
//!
//! Compiled for `cfg(test)` and behind the `test-util` feature so the
//! integration tests under `tests/` can reach them through the crate's
//! public API.

mod recording_transport;

pub use recording_transport::{RecordingTransport, SentDatagram};
