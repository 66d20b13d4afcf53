use std::{
    fmt::{self, Display, Formatter},
    io,
};

/// Errors when consuming a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// More bytes were requested than the stream currently buffers.
    Overread { requested: usize, buffered: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Overread {
                requested,
                buffered,
            } => write!(
                f,
                "requested {} bytes but only {} bytes are buffered",
                requested, buffered
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        io::Error::new(io::ErrorKind::Other, e)
    }
}
