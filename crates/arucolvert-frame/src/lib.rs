//! Sync-byte framing, running checksum, and pose decoding for serial links.
//!
//! Every frame on the wire is laid out as:
//! - two sync bytes `0xFF 0xFF`
//! - a 1-byte message id
//! - a 1-byte length covering content plus checksum
//! - the content, then a 2-byte little-endian running checksum
//!
//! [`FrameAssembler`] turns a byte stream into messages without ever
//! blocking on the link. [`PoseReader`] wraps it in a simple polling loop.

pub mod assembler;
pub mod checksum;
pub mod codec;
pub mod error;
pub mod message;
pub mod reader;
pub mod writer;

pub use assembler::{AssemblerStats, Discard, FrameAssembler, Poll, State};
pub use checksum::Checksum;
pub use codec::{
    encode_frame, encode_message, Frame, CHECKSUM_SIZE, HEADER_SIZE, MAX_CONTENT_SIZE, SYNC,
    SYNC_BYTE,
};
pub use error::{DecodeError, FrameError, Result};
pub use message::{Decodable, Message, MessageKind, MessageSet, Pose};
pub use reader::{PoseReader, ReaderConfig, DEFAULT_POLL_INTERVAL};
pub use writer::FrameWriter;
