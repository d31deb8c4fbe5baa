//! An in-memory transport that records every datagram it is asked to send.
//!
//! Clones share state, so a test keeps one copy for assertions and moves
//! another into the session under test.

use std::{io, net::SocketAddr, sync::Arc};

use parking_lot::Mutex;

use crate::{config::TransportHandle, transport::DatagramTransport};

/// One `send` call observed by [`RecordingTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentDatagram {
    pub handle: TransportHandle,
    pub payload: Vec<u8>,
}

impl SentDatagram {
    /// Payload decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

#[derive(Default)]
struct Recorded {
    next_handle: i32,
    peers: Vec<SocketAddr>,
    sent: Vec<SentDatagram>,
    closed: Vec<TransportHandle>,
    fail_open: bool,
    fail_send: bool,
}

/// Transport double that records calls instead of touching the network.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `open` calls fail with `ConnectionRefused`.
    pub fn fail_open(&self, fail: bool) {
        self.inner.lock().fail_open = fail;
    }

    /// Make subsequent `send` calls fail with `ConnectionRefused`. Failed
    /// sends are still recorded.
    pub fn fail_send(&self, fail: bool) {
        self.inner.lock().fail_send = fail;
    }

    /// Every datagram passed to `send`, in call order.
    pub fn sent(&self) -> Vec<SentDatagram> {
        self.inner.lock().sent.clone()
    }

    /// Payloads of every `send` call as text.
    pub fn texts(&self) -> Vec<String> {
        self.inner.lock().sent.iter().map(SentDatagram::text).collect()
    }

    /// Peers passed to successful `open` calls.
    pub fn opened(&self) -> Vec<SocketAddr> {
        self.inner.lock().peers.clone()
    }

    pub fn closed(&self) -> Vec<TransportHandle> {
        self.inner.lock().closed.clone()
    }

    pub fn clear(&self) {
        self.inner.lock().sent.clear();
    }
}

impl DatagramTransport for RecordingTransport {
    fn open(&mut self, peer: SocketAddr) -> io::Result<TransportHandle> {
        let mut inner = self.inner.lock();
        if inner.fail_open {
            return Err(io::Error::from(io::ErrorKind::ConnectionRefused));
        }
        let handle = TransportHandle::from_raw(inner.next_handle + 3);
        inner.next_handle += 1;
        inner.peers.push(peer);
        Ok(handle)
    }

    fn send(&mut self, handle: TransportHandle, payload: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock();
        inner.sent.push(SentDatagram {
            handle,
            payload: payload.to_vec(),
        });
        if inner.fail_send {
            return Err(io::Error::from(io::ErrorKind::ConnectionRefused));
        }
        Ok(payload.len())
    }

    fn close(&mut self, handle: TransportHandle) {
        self.inner.lock().closed.push(handle);
    }
}
