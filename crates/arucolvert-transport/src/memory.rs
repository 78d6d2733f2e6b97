use bytes::{Bytes, BytesMut};

use crate::error::{Result, TransportError};
use crate::traits::ByteSource;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// An in-memory byte source.
///
/// Bytes pushed with [`MemorySource::push`] become available immediately.
/// Useful for replaying captures and for driving the assembler in tests.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    buf: BytesMut,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Create a source pre-filled with `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut source = Self::new();
        source.push(bytes);
        source
    }

    /// Append bytes as if they had just arrived on the link.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl ByteSource for MemorySource {
    fn bytes_available(&mut self) -> Result<usize> {
        Ok(self.buf.len())
    }

    fn read(&mut self, n: usize) -> Result<Bytes> {
        if n > self.buf.len() {
            return Err(TransportError::Insufficient {
                requested: n,
                available: self.buf.len(),
            });
        }
        Ok(self.buf.split_to(n).freeze())
    }
}

impl From<&[u8]> for MemorySource {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Vec<u8>> for MemorySource {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            buf: BytesMut::from(bytes.as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_bytes_become_available() {
        let mut source = MemorySource::new();
        assert_eq!(source.bytes_available().unwrap(), 0);

        source.push(&[1, 2, 3]);
        assert_eq!(source.bytes_available().unwrap(), 3);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn read_consumes_in_order() {
        let mut source = MemorySource::from_bytes(&[0xFF, 0xFF, 0x01, 0x0E]);

        assert_eq!(source.read_byte().unwrap(), 0xFF);
        assert_eq!(source.read(2).unwrap().as_ref(), &[0xFF, 0x01]);
        assert_eq!(source.read(1).unwrap().as_ref(), &[0x0E]);
        assert!(source.is_empty());
    }

    #[test]
    fn read_past_buffer_is_rejected() {
        let mut source = MemorySource::from_bytes(&[1, 2]);
        let err = source.read(3).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Insufficient {
                requested: 3,
                available: 2
            }
        ));
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn read_zero_is_empty() {
        let mut source = MemorySource::new();
        assert!(source.read(0).unwrap().is_empty());
    }

    #[test]
    fn works_through_mutable_reference() {
        fn drain_one<S: ByteSource>(mut source: S) -> u8 {
            assert_eq!(source.bytes_available().unwrap(), 2);
            source.read_byte().unwrap()
        }

        let mut source = MemorySource::from(vec![7u8, 8]);
        assert_eq!(drain_one(&mut source), 7);
        assert_eq!(source.len(), 1);
    }
}
