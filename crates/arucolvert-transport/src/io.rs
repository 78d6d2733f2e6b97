use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::traits::ByteSource;

/// Maximum number of bytes pulled from the reader per availability query.
pub const READ_CHUNK_SIZE: usize = 4 * 1024;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Lower bound on the refill threshold, so small chunk sizes still buffer
/// enough for any single read of up to 256 bytes.
const MIN_REFILL_THRESHOLD: usize = 256;

/// Adapts any [`Read`] into a [`ByteSource`].
///
/// A call to [`bytes_available`](ByteSource::bytes_available) performs at
/// most one `read` on the inner reader and appends the result to an internal
/// buffer. No read happens while the buffer already holds a full chunk (or
/// 256 bytes, whichever is larger), so the buffer stays under two chunks
/// however slowly it is drained. `WouldBlock`, `TimedOut` and `Interrupted`
/// are treated as "nothing new yet". For a tty, configure the device's read
/// timeout (for example `VMIN=0 VTIME=1`) before handing it over so reads
/// return promptly.
pub struct IoSource<R> {
    inner: R,
    buf: BytesMut,
    chunk: Box<[u8]>,
    eof: bool,
}

impl IoSource<File> {
    /// Open a device node or capture file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TransportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(?path, "opened byte source");
        Ok(Self::new(file))
    }
}

impl<R: Read> IoSource<R> {
    /// Wrap a reader with the default chunk size.
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, READ_CHUNK_SIZE)
    }

    /// Wrap a reader, pulling at most `chunk_size` bytes per query.
    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            chunk: vec![0u8; chunk_size.max(1)].into_boxed_slice(),
            eof: false,
        }
    }

    /// Whether the reader has reported end of stream.
    ///
    /// Buffered bytes may still remain after EOF.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Number of bytes already pulled from the reader but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the source and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn refill_threshold(&self) -> usize {
        self.chunk.len().max(MIN_REFILL_THRESHOLD)
    }

    fn fill(&mut self) -> Result<()> {
        if self.eof || self.buf.len() >= self.refill_threshold() {
            return Ok(());
        }

        match self.inner.read(&mut self.chunk) {
            Ok(0) => {
                debug!("byte source reached end of stream");
                self.eof = true;
            }
            Ok(n) => {
                trace!(n, "pulled bytes from reader");
                self.buf.extend_from_slice(&self.chunk[..n]);
            }
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) => {}
            Err(err) => return Err(TransportError::Io(err)),
        }
        Ok(())
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn bytes_available(&mut self) -> Result<usize> {
        self.fill()?;
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

    fn is_exhausted(&self) -> bool {
        self.eof
    }
}

impl<R> std::fmt::Debug for IoSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoSource")
            .field("buffered", &self.buf.len())
            .field("chunk_size", &self.chunk.len())
            .field("eof", &self.eof)
            .finish()
    }
}
