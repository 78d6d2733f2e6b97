use bytes::Bytes;

use crate::error::Result;

/// A link that reports buffered bytes and hands them out without blocking.
///
/// Callers must only [`read`](ByteSource::read) as many bytes as the last
/// [`bytes_available`](ByteSource::bytes_available) reported.
pub trait ByteSource {
    /// Number of bytes currently buffered and ready to read.
    ///
    /// Implementations may pull pending data from the underlying device
    /// here, but must return promptly.
    fn bytes_available(&mut self) -> Result<usize>;

    /// Read exactly `n` buffered bytes.
    ///
    /// Returns [`TransportError::Insufficient`](crate::TransportError::Insufficient)
    /// when fewer than `n` bytes are buffered.
    fn read(&mut self, n: usize) -> Result<Bytes>;

    /// Read a single buffered byte.
    fn read_byte(&mut self) -> Result<u8> {
        let bytes = self.read(1)?;
        Ok(bytes[0])
    }

    /// Whether no further bytes will ever arrive beyond those buffered.
    ///
    /// Live links never end; capture files do.
    fn is_exhausted(&self) -> bool {
        false
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read(&mut self, n: usize) -> Result<Bytes> {
        (**self).read(n)
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read(&mut self, n: usize) -> Result<Bytes> {
        (**self).read(n)
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}
