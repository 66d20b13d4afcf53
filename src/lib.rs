/// Byte stream errors.
pub mod error;

/// Utility I/O functions that pump data through byte streams.
pub mod io;

/// Async pipe for handing bytes between tasks.
pub mod pipe;

/// Bounded single-producer/single-consumer byte stream.
pub mod stream;

pub use crate::{error::Error, stream::ByteStream};
