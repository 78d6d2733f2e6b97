//! Byte source abstraction for point-to-point serial links.
//!
//! The frame assembler only needs two things from a link:
//! - how many bytes are buffered and ready right now
//! - a read of exactly that many (or fewer) bytes that never waits
//!
//! [`ByteSource`] captures that contract. [`MemorySource`] backs it with an
//! in-memory buffer; [`IoSource`] wraps any [`std::io::Read`] such as a tty
//! device node or a capture file.

pub mod error;
pub mod io;
pub mod memory;
pub mod traits;

pub use error::{Result, TransportError};
pub use io::{IoSource, READ_CHUNK_SIZE};
pub use memory::MemorySource;
pub use traits::ByteSource;
