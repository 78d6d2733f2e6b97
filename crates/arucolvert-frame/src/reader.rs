//! Blocking pose reader on top of the frame assembler.

use std::time::{Duration, Instant};

use arucolvert_transport::ByteSource;
use tracing::debug;

use crate::assembler::{FrameAssembler, Poll};
use crate::error::{FrameError, Result};
use crate::message::Message;

/// Default sleep between polls that found no complete frame.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polling behaviour for [`PoseReader`].
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Sleep between empty polls. Default: 1 ms.
    pub poll_interval: Duration,
    /// Give up waiting for a message after this long. Default: wait forever.
    pub deadline: Option<Duration>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            deadline: None,
        }
    }
}

/// Blocking convenience over [`FrameAssembler`].
///
/// Polls the assembler until a message completes, sleeping between polls
/// that found too few bytes.
pub struct PoseReader<S> {
    assembler: FrameAssembler<S, Message>,
    config: ReaderConfig,
}

impl<S: ByteSource> PoseReader<S> {
    /// Create a reader with default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    /// Create a reader with explicit configuration.
    pub fn with_config(source: S, config: ReaderConfig) -> Self {
        Self {
            assembler: FrameAssembler::new(source),
            config,
        }
    }

    /// Wait for the next decoded message.
    ///
    /// Returns [`FrameError::SourceExhausted`] once the source has ended and
    /// no complete frame remains, and [`FrameError::Timeout`] when the
    /// configured deadline passes.
    pub fn next_message(&mut self) -> Result<Message> {
        let started = Instant::now();
        loop {
            match self.assembler.poll()? {
                Poll::Message(msg) => return Ok(msg),
                Poll::Discarded(discard) => {
                    debug!(?discard, "frame discarded while waiting for message");
                    self.check_deadline(started)?;
                }
                Poll::Pending => {
                    if self.assembler.get_ref().is_exhausted() {
                        return Err(FrameError::SourceExhausted);
                    }
                    self.check_deadline(started)?;
                    std::thread::sleep(self.config.poll_interval);
                }
            }
        }
    }

    fn check_deadline(&self, started: Instant) -> Result<()> {
        match self.config.deadline {
            Some(deadline) if started.elapsed() >= deadline => {
                Err(FrameError::Timeout(deadline))
            }
            _ => Ok(()),
        }
    }

    /// Wait for the next pose and return it as `(x, y, theta)`.
    pub fn next_pose(&mut self) -> Result<(f32, f32, f32)> {
        loop {
            if let Some(pose) = self.next_message()?.as_pose() {
                return Ok(pose.as_tuple());
            }
        }
    }

    /// The assembler driving this reader.
    pub fn assembler(&self) -> &FrameAssembler<S, Message> {
        &self.assembler
    }

    /// Mutable access to the assembler, e.g. to feed a memory source.
    pub fn assembler_mut(&mut self) -> &mut FrameAssembler<S, Message> {
        &mut self.assembler
    }

    /// Current reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Consume the reader and return the byte source.
    pub fn into_inner(self) -> S {
        self.assembler.into_inner()
    }
}
