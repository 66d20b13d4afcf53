//! Cross-task pipe built on a shared byte stream.
//!
//! The byte stream itself does no locking. A pipe puts one stream behind a
//! mutex and hands out an [`AsyncWrite`] half and an [`AsyncRead`] half, so a
//! producer task and a consumer task can exchange bytes with backpressure: a
//! full pipe parks the writer until the reader drains it.

use std::{
    io,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll, Waker},
};

use spin::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use crate::stream::ByteStream;

struct Shared {
    stream: ByteStream,
    reader_closed: bool,

    read_waker: Option<Waker>,
    write_waker: Option<Waker>,
}

impl Shared {
    fn wake_reader(&mut self) {
        if let Some(waker) = self.read_waker.take() {
            waker.wake();
        }
    }

    fn wake_writer(&mut self) {
        if let Some(waker) = self.write_waker.take() {
            waker.wake();
        }
    }
}

/// Creates a new pipe which buffers at most `capacity` bytes.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn pipe(capacity: usize) -> (PipeWriter, PipeReader) {
    let shared = Arc::new(Mutex::new(Shared {
        stream: ByteStream::new(capacity),
        reader_closed: false,
        read_waker: None,
        write_waker: None,
    }));

    (
        PipeWriter {
            shared: shared.clone(),
        },
        PipeReader { shared },
    )
}

/// The writing half of a pipe.
///
/// Dropping or shutting down the writer ends the input of the pipe.
pub struct PipeWriter {
    shared: Arc<Mutex<Shared>>,
}

impl PipeWriter {
    /// Returns the total number of bytes accepted by the pipe.
    pub fn bytes_written(&self) -> usize {
        self.shared.lock().stream.bytes_written()
    }
}

impl AsyncWrite for PipeWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut shared = self.shared.lock();

        if shared.reader_closed || shared.stream.input_ended() {
            return Err(io::ErrorKind::BrokenPipe.into()).into();
        }

        if buf.is_empty() {
            return Ok(0).into();
        }

        let n = shared.stream.write(buf);
        if n == 0 {
            shared.write_waker = Some(cx.waker().clone());
            return Poll::Pending;
        }

        shared.wake_reader();

        Ok(n).into()
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Ok(()).into()
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let mut shared = self.shared.lock();
        shared.stream.end_input();
        shared.wake_reader();

        Ok(()).into()
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        let mut shared = self.shared.lock();
        shared.stream.end_input();
        shared.wake_reader();
    }
}

/// The reading half of a pipe.
///
/// Reads return EOF once the writer has ended its input and every buffered
/// byte has been consumed.
pub struct PipeReader {
    shared: Arc<Mutex<Shared>>,
}

impl PipeReader {
    /// Returns the total number of bytes consumed from the pipe.
    pub fn bytes_read(&self) -> usize {
        self.shared.lock().stream.bytes_read()
    }
}

impl AsyncRead for PipeReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let mut shared = self.shared.lock();

        if buf.remaining() == 0 || shared.stream.eof() {
            return Ok(()).into();
        }

        let n = usize::min(buf.remaining(), shared.stream.buffer_size());
        if n == 0 {
            shared.read_waker = Some(cx.waker().clone());
            return Poll::Pending;
        }

        let data = shared.stream.read(n)?;
        buf.put_slice(&data);
        shared.wake_writer();

        Ok(()).into()
    }
}

impl Drop for PipeReader {
    fn drop(&mut self) {
        let mut shared = self.shared.lock();
        shared.reader_closed = true;
        shared.wake_writer();

        log::trace!(
            "Pipe reader closed with {} bytes unread",
            shared.stream.buffer_size()
        );
    }
}
