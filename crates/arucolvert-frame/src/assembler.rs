//! Stream-framing state machine.
//!
//! The assembler pulls bytes from a [`ByteSource`] one transition at a time:
//!
//! ```text
//! Idle ──FF──▶ SawFirstSync ──FF──▶ SawSecondSync ──id──▶ HaveMsgId ──len──▶ HaveMsgLen
//!  ▲  └─other─┘       │                                                          │
//!  └──────other───────┘◀─────────────── len bytes read, frame done ◀─────────────┘
//! ```
//!
//! Each transition fires only once the source reports at least
//! [`bytes_needed`](FrameAssembler::bytes_needed) bytes, so the assembler
//! never waits on the link.

use arucolvert_transport::ByteSource;
use tracing::{debug, trace, warn};

use crate::checksum;
use crate::codec::{CHECKSUM_SIZE, SYNC_BYTE};
use crate::error::{DecodeError, Result};
use crate::message::{Message, MessageSet};

/// Where the assembler is within the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Hunting for the first sync byte.
    Idle,
    /// One sync byte seen.
    SawFirstSync,
    /// Both sync bytes seen, next byte is the message id.
    SawSecondSync,
    /// Message id read, next byte is the payload length.
    HaveMsgId,
    /// Length read, waiting for the whole payload.
    HaveMsgLen,
}

/// Why a fully read frame produced no message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discard {
    /// The trailing checksum did not match.
    ChecksumMismatch {
        msg_id: u8,
        msg_len: u8,
        expected: u16,
        received: u16,
    },
    /// The length field is too small to hold the checksum.
    MalformedLength { msg_id: u8, msg_len: u8 },
    /// Checksum was valid but no decoder is registered for the id.
    UnknownKind { msg_id: u8 },
    /// Checksum was valid but the decoder rejected the content.
    InvalidContent { msg_id: u8, error: DecodeError },
}

/// Outcome of one [`FrameAssembler::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum Poll<M = Message> {
    /// The source holds fewer bytes than the next transition needs.
    Pending,
    /// A frame was validated and decoded.
    Message(M),
    /// A frame was consumed and dropped.
    Discarded(Discard),
}

impl<M> Poll<M> {
    /// The decoded message, if any.
    pub fn into_message(self) -> Option<M> {
        match self {
            Poll::Message(msg) => Some(msg),
            Poll::Pending | Poll::Discarded(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Poll::Pending)
    }
}

/// Running counters for everything the assembler has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerStats {
    pub frames_decoded: u64,
    pub checksum_failures: u64,
    pub malformed_lengths: u64,
    pub unknown_kinds: u64,
    pub invalid_contents: u64,
    /// Bytes dropped while hunting for sync.
    pub resync_bytes: u64,
}

impl AssemblerStats {
    /// Total frames consumed without producing a message.
    pub fn frames_discarded(&self) -> u64 {
        self.checksum_failures + self.malformed_lengths + self.unknown_kinds + self.invalid_contents
    }
}

/// Reassembles frames from a byte source, one message per call at most.
pub struct FrameAssembler<S, M = Message> {
    source: S,
    state: State,
    bytes_needed: usize,
    msg_id: u8,
    msg_len: u8,
    stats: AssemblerStats,
    _messages: std::marker::PhantomData<fn() -> M>,
}

impl<S: ByteSource> FrameAssembler<S, Message> {
    /// Create an assembler producing the built-in [`Message`] set.
    pub fn new(source: S) -> Self {
        Self::with_messages(source)
    }
}

impl<S: ByteSource, M: MessageSet> FrameAssembler<S, M> {
    /// Create an assembler producing an arbitrary [`MessageSet`].
    pub fn with_messages(source: S) -> Self {
        Self {
            source,
            state: State::Idle,
            bytes_needed: 1,
            msg_id: 0,
            msg_len: 0,
            stats: AssemblerStats::default(),
            _messages: std::marker::PhantomData,
        }
    }

    /// Advance as far as the buffered bytes allow.
    ///
    /// Returns as soon as a frame completes (decoded or discarded), or when
    /// the source holds fewer bytes than the next transition needs.
    pub fn poll(&mut self) -> Result<Poll<M>> {
        while self.source.bytes_available()? >= self.bytes_needed {
            if let Some(outcome) = self.step()? {
                return Ok(outcome);
            }
        }
        Ok(Poll::Pending)
    }

    /// Advance and return a message if one completed during this call.
    ///
    /// Pending input and discarded frames both yield `None`.
    pub fn poll_message(&mut self) -> Result<Option<M>> {
        Ok(self.poll()?.into_message())
    }

    fn step(&mut self) -> Result<Option<Poll<M>>> {
        match self.state {
            State::Idle => {
                let byte = self.source.read_byte()?;
                if byte == SYNC_BYTE {
                    self.state = State::SawFirstSync;
                } else {
                    self.skip(byte);
                }
            }
            State::SawFirstSync => {
                let byte = self.source.read_byte()?;
                if byte == SYNC_BYTE {
                    self.state = State::SawSecondSync;
                } else {
                    self.skip(byte);
                    self.state = State::Idle;
                }
            }
            State::SawSecondSync => {
                self.msg_id = self.source.read_byte()?;
                self.state = State::HaveMsgId;
            }
            State::HaveMsgId => {
                self.msg_len = self.source.read_byte()?;
                if usize::from(self.msg_len) < CHECKSUM_SIZE {
                    debug!(
                        msg_id = self.msg_id,
                        msg_len = self.msg_len,
                        "malformed frame length"
                    );
                    self.stats.malformed_lengths += 1;
                    let discard = Discard::MalformedLength {
                        msg_id: self.msg_id,
                        msg_len: self.msg_len,
                    };
                    self.reset();
                    return Ok(Some(Poll::Discarded(discard)));
                }
                self.bytes_needed = usize::from(self.msg_len);
                self.state = State::HaveMsgLen;
            }
            State::HaveMsgLen => {
                let payload = self.source.read(self.bytes_needed)?;
                let outcome = self.finish(&payload);
                self.reset();
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    fn finish(&mut self, payload: &[u8]) -> Poll<M> {
        let (msg_id, msg_len) = (self.msg_id, self.msg_len);
        let Some((content, received)) = checksum::received(payload) else {
            self.stats.malformed_lengths += 1;
            return Poll::Discarded(Discard::MalformedLength { msg_id, msg_len });
        };

        let expected = checksum::frame_checksum(msg_id, msg_len, content);
        if expected != received {
            debug!(msg_id, msg_len, expected, received, "checksum mismatch");
            self.stats.checksum_failures += 1;
            return Poll::Discarded(Discard::ChecksumMismatch {
                msg_id,
                msg_len,
                expected,
                received,
            });
        }

        match M::decode(msg_id, content) {
            Ok(msg) => {
                trace!(msg_id, msg_len, "frame decoded");
                self.stats.frames_decoded += 1;
                Poll::Message(msg)
            }
            Err(DecodeError::UnknownMessageKind(id)) => {
                warn!(msg_id = id, "message id unknown, frame dropped");
                self.stats.unknown_kinds += 1;
                Poll::Discarded(Discard::UnknownKind { msg_id: id })
            }
            Err(error) => {
                warn!(msg_id, %error, "frame content rejected");
                self.stats.invalid_contents += 1;
                Poll::Discarded(Discard::InvalidContent { msg_id, error })
            }
        }
    }

    fn skip(&mut self, byte: u8) {
        trace!(byte, "resync: dropping non-sync byte");
        self.stats.resync_bytes += 1;
    }
}

impl<S, M> FrameAssembler<S, M> {
    /// Drop any partial frame and hunt for sync again.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.bytes_needed = 1;
        self.msg_id = 0;
        self.msg_len = 0;
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Bytes the source must hold before the next transition can fire.
    pub fn bytes_needed(&self) -> usize {
        self.bytes_needed
    }

    /// Counters accumulated since creation.
    pub fn stats(&self) -> &AssemblerStats {
        &self.stats
    }

    /// Borrow the byte source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Mutably borrow the byte source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consume the assembler and return the byte source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S, M> std::fmt::Debug for FrameAssembler<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameAssembler")
            .field("state", &self.state)
            .field("bytes_needed", &self.bytes_needed)
            .field("msg_id", &self.msg_id)
            .field("msg_len", &self.msg_len)
            .field("stats", &self.stats)
            .finish()
    }
}
