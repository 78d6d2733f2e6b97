//! Decode pose frames from a serial marker tracker.
//!
//! # Crate Structure
//!
//! - [`transport`]: Byte sources (in-memory buffers, device nodes, capture files)
//! - [`frame`]: Framing, checksum, message decoding and the polling reader
//!
//! # Example
//!
//! ```no_run
//! use arucolvert::frame::PoseReader;
//! use arucolvert::transport::IoSource;
//!
//! let source = IoSource::open("/dev/ttyACM0")?;
//! let mut reader = PoseReader::new(source);
//! let (x, y, theta) = reader.next_pose()?;
//! println!("x={x} y={y} theta={theta}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use arucolvert_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use arucolvert_frame::*;
}

pub use arucolvert_frame::{FrameAssembler, Message, Pose, PoseReader};
