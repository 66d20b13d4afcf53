//! Bounded single-producer/single-consumer byte stream.

mod buf;

use std::{
    fmt::{self, Debug, Formatter},
    io,
};

use crate::{error::Error, stream::buf::RingBuf};

/// A capacity-bounded, ordered queue of bytes.
///
/// The writer side appends with [`write`](ByteStream::write) and signals
/// completion with [`end_input`](ByteStream::end_input). The reader side
/// consumes from the front with [`read`](ByteStream::read),
/// [`peek_output`](ByteStream::peek_output) and
/// [`pop_output`](ByteStream::pop_output).
///
/// A full stream rejects further input until the reader drains it, which is
/// the only backpressure mechanism. `bytes_written() - bytes_read()` always
/// equals `buffer_size()`.
pub struct ByteStream {
    buf: RingBuf,
    input_ended: bool,
    bytes_written: usize,
    bytes_read: usize,
    error: bool,
}

impl ByteStream {
    /// Creates a new byte stream holding at most `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        ByteStream {
            buf: RingBuf::new(capacity),
            input_ended: false,
            bytes_written: 0,
            bytes_read: 0,
            error: false,
        }
    }

    /// Writes as many bytes of `data` as fit into the stream.
    ///
    /// Returns the number of bytes accepted. Nothing is accepted after
    /// [`end_input`](ByteStream::end_input).
    pub fn write(&mut self, data: &[u8]) -> usize {
        if self.input_ended {
            return 0;
        }

        let n = self.buf.push(data);
        self.bytes_written += n;

        n
    }

    /// Returns a copy of the first `len` buffered bytes, clamped to what is
    /// buffered.
    pub fn peek_output(&self, len: usize) -> Vec<u8> {
        let n = usize::min(len, self.buf.len());
        let mut out = Vec::with_capacity(n);
        self.buf.copy_front(n, &mut out);

        out
    }

    /// Removes `len` bytes from the front of the stream.
    ///
    /// Asking for more than is buffered sets the sticky error flag and
    /// discards everything buffered.
    pub fn pop_output(&mut self, len: usize) -> Result<(), Error> {
        let buffered = self.buf.len();

        if len > buffered {
            log::debug!("Pop {} bytes from {} buffered bytes", len, buffered);

            self.set_error();
            self.buf.clear();
            self.bytes_read += buffered;

            return Err(Error::Overread {
                requested: len,
                buffered,
            });
        }

        self.buf.advance(len);
        self.bytes_read += len;

        Ok(())
    }

    /// Removes and returns the first `len` bytes of the stream.
    ///
    /// Asking for more than is buffered sets the sticky error flag and leaves
    /// the stream untouched.
    pub fn read(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        let buffered = self.buf.len();

        if len > buffered {
            log::debug!("Read {} bytes from {} buffered bytes", len, buffered);

            self.set_error();

            return Err(Error::Overread {
                requested: len,
                buffered,
            });
        }

        let mut out = Vec::with_capacity(len);
        self.buf.copy_front(len, &mut out);
        self.buf.advance(len);
        self.bytes_read += len;

        Ok(out)
    }

    /// Signals that the writer will produce no more bytes.
    pub fn end_input(&mut self) {
        if !self.input_ended {
            log::trace!("Input ended after {} bytes", self.bytes_written);
        }

        self.input_ended = true;
    }

    /// Returns true if the writer has ended its input.
    pub fn input_ended(&self) -> bool {
        self.input_ended
    }

    /// Returns the number of bytes currently buffered.
    pub fn buffer_size(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing is buffered.
    pub fn buffer_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns true if no more bytes will ever come out of the stream.
    pub fn eof(&self) -> bool {
        self.buffer_empty() && self.input_ended
    }

    /// Returns the total number of bytes ever accepted by `write`.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Returns the total number of bytes ever removed by `read` or
    /// `pop_output`.
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// Returns how many more bytes the stream can accept right now.
    pub fn remaining_capacity(&self) -> usize {
        self.buf.remaining()
    }

    /// Returns the maximum number of bytes the stream can hold.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns true if the stream has ever been overread.
    pub fn error(&self) -> bool {
        self.error
    }

    /// Marks the stream as errored. The flag is never cleared.
    pub fn set_error(&mut self) {
        self.error = true;
    }
}

impl Debug for ByteStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream")
            .field("capacity", &self.capacity())
            .field("buffer_size", &self.buffer_size())
            .field("bytes_written", &self.bytes_written)
            .field("bytes_read", &self.bytes_read)
            .field("input_ended", &self.input_ended)
            .field("error", &self.error)
            .finish()
    }
}

impl io::Write for ByteStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(ByteStream::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = usize::min(buf.len(), self.buffer_size());
        let data = ByteStream::read(self, n)?;
        buf[..n].copy_from_slice(&data);

        Ok(n)
    }
}
