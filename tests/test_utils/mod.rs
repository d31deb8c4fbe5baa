//! Fixtures shared by the integration tests.
//!
//! `UdpSink` binds an ephemeral UDP listener on the loopback interface and
//! forwards every datagram it receives over a channel, so tests can wait for
//! a specific number of datagrams without blocking on the socket directly.

use std::{net::UdpSocket, thread, time::Duration};

use crossbeam_channel::{Receiver, unbounded};
use rstest::fixture;

/// How long a test waits for a datagram before giving up.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Loopback listener standing in for the remote log host.
pub struct UdpSink {
    pub port: u16,
    rx: Receiver<Vec<u8>>,
}

impl UdpSink {
    pub fn bind() -> Self {
        let socket = UdpSocket::bind(("127.0.0.1", 0)).expect("bind loopback listener");
        let port = socket.local_addr().expect("listener has address").port();
        let (tx, rx) = unbounded();
        thread::spawn(move || {
            let mut buf = vec![0u8; 65_536];
            while let Ok(n) = socket.recv(&mut buf) {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        });
        Self { port, rx }
    }

    /// Wait for the next datagram.
    pub fn next(&self) -> Vec<u8> {
        self.rx
            .recv_timeout(RECV_TIMEOUT)
            .expect("datagram should arrive")
    }

    /// Wait for the next datagram and decode it as UTF-8.
    pub fn next_text(&self) -> String {
        String::from_utf8(self.next()).expect("datagram is UTF-8")
    }

    /// Wait for `count` datagrams.
    pub fn take(&self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.next_text()).collect()
    }

    /// Assert nothing else arrives within a short grace period.
    #[allow(dead_code)]
    pub fn assert_quiet(&self) {
        assert!(
            self.rx.recv_timeout(Duration::from_millis(200)).is_err(),
            "no further datagrams expected"
        );
    }
}

#[fixture]
pub fn sink() -> UdpSink {
    UdpSink::bind()
}
