//! Fixed-capacity text buffer used to format outgoing datagrams.
//!
//! [`BoundedBuf`] implements [`fmt::Write`] over an inline byte array. It
//! never grows: text past the capacity is discarded, the cut lands on a UTF-8
//! character boundary, and the byte after the content is always `0`.

use std::fmt;

/// Capacity, in bytes, of every formatting buffer in the crate.
pub const MESSAGE_CAPACITY: usize = 2048;

/// Buffer sized for a single datagram.
pub type MessageBuf = BoundedBuf<MESSAGE_CAPACITY>;

/// Inline, NUL-terminated text buffer holding at most `N - 1` bytes.
pub struct BoundedBuf<const N: usize> {
    bytes: [u8; N],
    len: usize,
    truncated: bool,
}

impl<const N: usize> BoundedBuf<N> {
    const LIMIT: usize = {
        assert!(N > 0, "BoundedBuf requires room for the terminator");
        N - 1
    };

    pub fn new() -> Self {
        Self {
            bytes: [0; N],
            len: 0,
            truncated: false,
        }
    }

    /// Format `args` into a fresh buffer, truncating on overflow.
    pub fn from_args(args: fmt::Arguments<'_>) -> Self {
        let mut buf = Self::new();
        // Overflow surfaces as `fmt::Error`; the retained prefix is the result.
        let _ = fmt::Write::write_fmt(&mut buf, args);
        buf
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `true` once any write has been cut short.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Content followed by its terminating `0` byte.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes[..=self.len]
    }

    pub fn as_str(&self) -> &str {
        // Writes only ever copy whole characters.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.bytes[0] = 0;
        self.len = 0;
        self.truncated = false;
    }

    fn remaining(&self) -> usize {
        Self::LIMIT - self.len
    }
}

impl<const N: usize> Default for BoundedBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for BoundedBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Err(fmt::Error);
        }
        let room = self.remaining();
        let take = if s.len() <= room {
            s.len()
        } else {
            floor_char_boundary(s, room)
        };
        self.bytes[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        self.bytes[self.len] = 0;
        if take < s.len() {
            self.truncated = true;
            return Err(fmt::Error);
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for BoundedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBuf")
            .field("capacity", &N)
            .field("len", &self.len)
            .field("truncated", &self.truncated)
            .field("text", &self.as_str())
            .finish()
    }
}

impl<const N: usize> fmt::Display for BoundedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
