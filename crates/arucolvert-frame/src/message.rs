//! Message kinds and their payload decoders.
//!
//! Each kind is a struct implementing [`Decodable`], listed in
//! [`MessageKind`] and dispatched by [`Message::decode`]. Adding a kind means
//! adding those three pieces; the assembler does not change.

use std::fmt;

use bytes::{BufMut, BytesMut};

use crate::error::DecodeError;

/// Known message kinds, keyed by their wire id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    /// 2D pose: heading, x, y.
    Pose = 1,
}

impl MessageKind {
    /// All registered kinds.
    pub const ALL: [MessageKind; 1] = [MessageKind::Pose];

    /// Look up the kind registered for a wire id.
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Pose),
            _ => None,
        }
    }

    /// Wire id of this kind.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pose => "pose",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = DecodeError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(DecodeError::UnknownMessageKind(id))
    }
}

/// A message variant with a fixed wire id and content layout.
pub trait Decodable: Sized {
    /// Kind this type is registered under.
    const KIND: MessageKind;

    /// Decode from content bytes (checksum already stripped).
    ///
    /// Must consume all of `content`.
    fn decode(content: &[u8]) -> Result<Self, DecodeError>;

    /// Append the content bytes for this message.
    fn encode(&self, dst: &mut BytesMut);

    /// Number of content bytes [`encode`](Decodable::encode) produces.
    fn content_len(&self) -> usize;
}

/// A closed set of message kinds the assembler can produce.
pub trait MessageSet: Sized {
    /// Decode content received under `msg_id`.
    ///
    /// Returns [`DecodeError::UnknownMessageKind`] for ids outside the set.
    fn decode(msg_id: u8, content: &[u8]) -> Result<Self, DecodeError>;
}

/// 2D pose of the tracked marker.
///
/// On the wire the content is three little-endian `f32`: theta, x, y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    /// Heading in radians.
    pub theta: f32,
}

impl Pose {
    /// Content size on the wire.
    pub const CONTENT_LEN: usize = 12;

    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self { x, y, theta }
    }

    /// `(x, y, theta)` tuple.
    pub fn as_tuple(&self) -> (f32, f32, f32) {
        (self.x, self.y, self.theta)
    }
}

impl Decodable for Pose {
    const KIND: MessageKind = MessageKind::Pose;

    fn decode(content: &[u8]) -> Result<Self, DecodeError> {
        let words: &[u8; Self::CONTENT_LEN] =
            content.try_into().map_err(|_| DecodeError::InvalidLength {
                kind: Self::KIND.name(),
                expected: Self::CONTENT_LEN,
                actual: content.len(),
            })?;

        let theta = f32::from_le_bytes([words[0], words[1], words[2], words[3]]);
        let x = f32::from_le_bytes([words[4], words[5], words[6], words[7]]);
        let y = f32::from_le_bytes([words[8], words[9], words[10], words[11]]);
        Ok(Self { x, y, theta })
    }

    fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(Self::CONTENT_LEN);
        dst.put_f32_le(self.theta);
        dst.put_f32_le(self.x);
        dst.put_f32_le(self.y);
    }

    fn content_len(&self) -> usize {
        Self::CONTENT_LEN
    }
}

/// Any message this crate knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Pose(Pose),
}

impl Message {
    /// Kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Pose(_) => MessageKind::Pose,
        }
    }

    /// Decode content received under `msg_id`.
    pub fn decode(msg_id: u8, content: &[u8]) -> Result<Self, DecodeError> {
        match MessageKind::try_from(msg_id)? {
            MessageKind::Pose => Pose::decode(content).map(Message::Pose),
        }
    }

    /// The pose, if this is a pose message.
    pub fn as_pose(&self) -> Option<&Pose> {
        match self {
            Message::Pose(pose) => Some(pose),
        }
    }
}

impl MessageSet for Message {
    fn decode(msg_id: u8, content: &[u8]) -> Result<Self, DecodeError> {
        Message::decode(msg_id, content)
    }
}

impl From<Pose> for Message {
    fn from(pose: Pose) -> Self {
        Message::Pose(pose)
    }
}
