//! Sending side: frame encoding onto any `Write` sink.

use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, encode_message, Frame};
use crate::error::{FrameError, Result};
use crate::message::Decodable;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Writes complete frames to any `Write` sink.
///
/// This is the sending side of the link: a tracker, a simulator, or a tool
/// producing capture files.
pub struct FrameWriter<W> {
    inner: W,
    buf: BytesMut,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.msg_id, frame.content.as_ref())
    }

    /// Encode and send a typed message.
    pub fn write_message<M: Decodable>(&mut self, message: &M) -> Result<()> {
        self.buf.clear();
        encode_message(message, &mut self.buf)?;
        self.write_buffered()
    }

    /// Encode and send raw content under `msg_id`.
    pub fn send(&mut self, msg_id: u8, content: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(msg_id, content, &mut self.buf)?;
        self.write_buffered()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the writer and return the inner sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use arucolvert_transport::MemorySource;

    use super::*;
    use crate::assembler::FrameAssembler;
    use crate::message::{Message, Pose};

    fn written(writer: FrameWriter<Cursor<Vec<u8>>>) -> Vec<u8> {
        writer.into_inner().into_inner()
    }

    #[test]
    fn written_pose_decodes() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::new()));
        writer.write_message(&Pose::new(0.5, -0.5, 1.57)).unwrap();

        let wire = written(writer);
        let mut asm = FrameAssembler::new(MemorySource::from_bytes(&wire));
        let msg = asm.poll_message().unwrap().unwrap();
        assert_eq!(msg, Message::Pose(Pose::new(0.5, -0.5, 1.57)));
    }

    #[test]
    fn write_multiple_frames() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::new()));
        writer.send(5, b"one").unwrap();
        writer.write_frame(&Frame::new(6, "two")).unwrap();

        let wire = written(writer);
        let mut asm: FrameAssembler<_, Frame> =
            FrameAssembler::with_messages(MemorySource::from_bytes(&wire));

        let f1 = asm.poll_message().unwrap().unwrap();
        let f2 = asm.poll_message().unwrap().unwrap();
        assert_eq!((f1.msg_id, f1.content.as_ref()), (5, b"one".as_ref()));
        assert_eq!((f2.msg_id, f2.content.as_ref()), (6, b"two".as_ref()));
    }

    #[test]
    fn oversized_content_rejected() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::new()));
        let err = writer.send(1, &[0u8; 300]).unwrap_err();
        assert!(matches!(err, FrameError::ContentTooLarge { size: 300, .. }));
        assert!(written(writer).is_empty());
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let sink = InterruptedOnce {
            wrote_once: false,
            flushed_once: false,
            data: Vec::new(),
        };
        let mut writer = FrameWriter::new(sink);
        writer.send(2, b"retry").unwrap();

        assert_eq!(writer.get_ref().data.len(), 4 + 5 + 2);
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.send(1, b"x").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    struct InterruptedOnce {
        wrote_once: bool,
        flushed_once: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedOnce {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            // Short writes exercise the offset loop.
            let n = buf.len().min(3);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flushed_once {
                self.flushed_once = true;
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
