//! Datagram transport primitives.
//!
//! A session talks to the network through [`DatagramTransport`]: open a
//! handle bound to one peer, send whole datagrams on it, close it. The
//! production implementation, [`UdpTransport`], keeps its sockets in a
//! process-wide table so a handle behaves like a file descriptor: any session
//! that adopts a config carrying the handle can send on it.

use std::{
    collections::HashMap,
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket},
    sync::Arc,
    time::Duration,
};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::config::TransportHandle;

/// Connectionless transport with a fixed peer per handle.
pub trait DatagramTransport: Send {
    /// Create a socket "connected" to `peer` and return its handle.
    fn open(&mut self, peer: SocketAddr) -> io::Result<TransportHandle>;

    /// Send `payload` as a single datagram, returning the number of bytes
    /// written.
    fn send(&mut self, handle: TransportHandle, payload: &[u8]) -> io::Result<usize>;

    /// Release the socket behind `handle`. Unknown handles are ignored.
    fn close(&mut self, handle: TransportHandle);
}

/// Resolve `server:port` to the first usable socket address.
pub fn resolve_peer(server: &str, port: u16) -> io::Result<SocketAddr> {
    (server, port).to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no address found for {server}:{port}"),
        )
    })
}

#[derive(Default)]
struct SocketTable {
    next: i32,
    sockets: HashMap<TransportHandle, Arc<UdpSocket>>,
}

impl SocketTable {
    fn insert(&mut self, socket: UdpSocket) -> io::Result<TransportHandle> {
        if self.next == i32::MAX {
            return Err(io::Error::other("transport handle space exhausted"));
        }
        let handle = TransportHandle::from_raw(self.next);
        self.next += 1;
        self.sockets.insert(handle, Arc::new(socket));
        Ok(handle)
    }
}

static SOCKETS: Lazy<Mutex<SocketTable>> = Lazy::new(|| Mutex::new(SocketTable::default()));

/// UDP implementation of [`DatagramTransport`].
#[derive(Clone, Debug, Default)]
pub struct UdpTransport {
    write_timeout: Option<Duration>,
}

impl UdpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound how long a single `send` may block.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    fn socket(handle: TransportHandle) -> io::Result<Arc<UdpSocket>> {
        SOCKETS.lock().sockets.get(&handle).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotConnected,
                format!("no socket for transport handle {handle}"),
            )
        })
    }
}

impl DatagramTransport for UdpTransport {
    fn open(&mut self, peer: SocketAddr) -> io::Result<TransportHandle> {
        let local: SocketAddr = match peer {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(peer)?;
        if self.write_timeout.is_some() {
            socket.set_write_timeout(self.write_timeout)?;
        }
        SOCKETS.lock().insert(socket)
    }

    fn send(&mut self, handle: TransportHandle, payload: &[u8]) -> io::Result<usize> {
        let socket = Self::socket(handle)?;
        socket.send(payload)
    }

    fn close(&mut self, handle: TransportHandle) {
        SOCKETS.lock().sockets.remove(&handle);
    }
}
