//! Wire layout constants and frame encoding.

use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::Checksum;
use crate::error::{DecodeError, FrameError, Result};
use crate::message::{Decodable, MessageSet};

/// Frame start marker byte. Two of them open every frame.
pub const SYNC_BYTE: u8 = 0xFF;

/// Frame start marker.
pub const SYNC: [u8; 2] = [SYNC_BYTE, SYNC_BYTE];

/// Frame header: sync (2) + msg_id (1) + msg_len (1) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Trailing little-endian checksum.
pub const CHECKSUM_SIZE: usize = 2;

/// Largest content that fits once the checksum is counted in `msg_len`.
pub const MAX_CONTENT_SIZE: usize = u8::MAX as usize - CHECKSUM_SIZE;

/// A validated frame whose content has not been interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message kind identifier.
    pub msg_id: u8,
    /// Content bytes, checksum stripped.
    pub content: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(msg_id: u8, content: impl Into<Bytes>) -> Self {
        Self {
            msg_id,
            content: content.into(),
        }
    }

    /// Value of the on-wire length field (content + checksum).
    pub fn msg_len(&self) -> usize {
        self.content.len() + CHECKSUM_SIZE
    }

    /// The total wire size of this frame (header + content + checksum).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.msg_len()
    }
}

/// Accepts every id and keeps the content as-is.
///
/// Lets the assembler run as a pure framer, e.g. to inspect captures that
/// carry kinds this crate has no decoder for.
impl MessageSet for Frame {
    fn decode(msg_id: u8, content: &[u8]) -> std::result::Result<Self, DecodeError> {
        Ok(Frame::new(msg_id, Bytes::copy_from_slice(content)))
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬────────┬─────────┬──────────────────┬──────────────┐
/// │ Sync (2B) │ Id     │ Len     │ Content          │ Checksum     │
/// │ 0xFF 0xFF │ (1B)   │ (1B)    │ (Len - 2 bytes)  │ (2B LE)      │
/// └───────────┴────────┴─────────┴──────────────────┴──────────────┘
/// ```
///
/// The checksum covers Id, Len and Content.
pub fn encode_frame(msg_id: u8, content: &[u8], dst: &mut BytesMut) -> Result<()> {
    if content.len() > MAX_CONTENT_SIZE {
        return Err(FrameError::ContentTooLarge {
            size: content.len(),
            max: MAX_CONTENT_SIZE,
        });
    }
    let msg_len = (content.len() + CHECKSUM_SIZE) as u8;

    let mut ck = Checksum::new();
    ck.update(msg_id);
    ck.update(msg_len);
    ck.update_slice(content);

    dst.reserve(HEADER_SIZE + usize::from(msg_len));
    dst.put_slice(&SYNC);
    dst.put_u8(msg_id);
    dst.put_u8(msg_len);
    dst.put_slice(content);
    dst.put_u16_le(ck.finalize());
    Ok(())
}

/// Encode a typed message into the wire format.
pub fn encode_message<M: Decodable>(message: &M, dst: &mut BytesMut) -> Result<()> {
    let mut content = BytesMut::with_capacity(message.content_len());
    message.encode(&mut content);
    encode_frame(M::KIND.id(), &content, dst)
}
