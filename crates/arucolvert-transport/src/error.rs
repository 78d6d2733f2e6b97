use std::path::PathBuf;

/// Errors that can occur while pulling bytes from a link.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the device node or capture file.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the underlying reader.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A read asked for more bytes than are buffered.
    #[error("requested {requested} bytes but only {available} are buffered")]
    Insufficient { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, TransportError>;
