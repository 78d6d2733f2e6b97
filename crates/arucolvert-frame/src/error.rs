use std::time::Duration;

use arucolvert_transport::TransportError;

/// Errors raised while turning frame content into a typed message.
///
/// These never escape the assembler as `Err`; they surface as
/// [`Discard`](crate::Discard) outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// No decoder is registered for this message id.
    #[error("message id {0} unknown")]
    UnknownMessageKind(u8),

    /// The content length does not match what the kind expects.
    #[error("{kind} content must be {expected} bytes, got {actual}")]
    InvalidLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Errors that can occur while reading or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The byte source failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// An I/O error occurred while writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Content does not fit in the one-byte length field.
    #[error("content too large ({size} bytes, max {max})")]
    ContentTooLarge { size: usize, max: usize },

    /// The sink accepted zero bytes.
    #[error("connection closed")]
    ConnectionClosed,

    /// The source reached end of stream with no complete frame left.
    #[error("byte source exhausted")]
    SourceExhausted,

    /// No message arrived before the deadline.
    #[error("no message within {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, FrameError>;
