//! Running 16-bit checksum over frame header and content.
//!
//! Two 8-bit accumulators, both starting at zero. For every byte:
//! `a = (a + byte) mod 256`, then `b = (b + a) mod 256`. The result is
//! `(a << 8) | b`.
//!
//! Any single corrupted byte is detected. The checksum is not cryptographic:
//! some multi-byte corruptions cancel out and go unnoticed.

/// Incremental running checksum.
///
/// Use this when the checksummed bytes are not contiguous, e.g. while
/// encoding a frame header and content separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum {
    a: u8,
    b: u8,
}

impl Checksum {
    /// Create a checksum with both accumulators at zero.
    #[must_use]
    pub fn new() -> Self {
        Self { a: 0, b: 0 }
    }

    /// Fold a single byte into the checksum.
    #[inline]
    pub fn update(&mut self, byte: u8) {
        self.a = self.a.wrapping_add(byte);
        self.b = self.b.wrapping_add(self.a);
    }

    /// Fold a byte slice into the checksum.
    #[inline]
    pub fn update_slice(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Current checksum value.
    #[inline]
    #[must_use]
    pub fn finalize(self) -> u16 {
        (u16::from(self.a) << 8) | u16::from(self.b)
    }
}

/// Compute the checksum of a byte slice.
#[must_use]
pub fn compute(bytes: &[u8]) -> u16 {
    let mut ck = Checksum::new();
    ck.update_slice(bytes);
    ck.finalize()
}

/// Checksum of `[msg_id, msg_len] + content`, as carried on the wire.
#[must_use]
pub fn frame_checksum(msg_id: u8, msg_len: u8, content: &[u8]) -> u16 {
    let mut ck = Checksum::new();
    ck.update(msg_id);
    ck.update(msg_len);
    ck.update_slice(content);
    ck.finalize()
}

/// Verify a received payload (content followed by a little-endian checksum).
///
/// Returns `false` on mismatch, and for payloads too short to carry a
/// checksum.
#[must_use]
pub fn verify(msg_id: u8, msg_len: u8, payload: &[u8]) -> bool {
    received(payload).is_some_and(|(content, rcv)| frame_checksum(msg_id, msg_len, content) == rcv)
}

/// Split a payload into content and the little-endian checksum it carries.
pub(crate) fn received(payload: &[u8]) -> Option<(&[u8], u16)> {
    let split = payload.len().checked_sub(crate::codec::CHECKSUM_SIZE)?;
    let (content, tail) = payload.split_at(split);
    Some((content, u16::from_le_bytes([tail[0], tail[1]])))
}
