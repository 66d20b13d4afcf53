//! Utility I/O functions.

use std::{
    future::Future,
    io::{self, ErrorKind},
    time::Duration,
};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{pipe::pipe, stream::ByteStream};

pub mod constants {
    /// The maximum number of bytes moved by a single copy step.
    pub const CHUNK_SIZE: usize = 16 * 1024;
}

use constants::CHUNK_SIZE;

/// Copies from reader to writer only once.
///
/// Returns the number of bytes copied.
#[inline]
pub async fn copy_once<R, W>(reader: &mut R, writer: &mut W) -> io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut payload = [0u8; CHUNK_SIZE];

    let bytes_copied = reader.read(&mut payload).await?;
    if bytes_copied != 0 {
        writer.write_all(&payload[..bytes_copied]).await?;
    }

    Ok(bytes_copied)
}

/// Reads from reader into the byte stream only once.
///
/// At most `remaining_capacity()` bytes are read, so nothing read is ever
/// dropped. Ends the input of the stream when the reader reaches EOF.
///
/// Returns the number of bytes accepted by the stream.
pub async fn fill_once<R>(reader: &mut R, stream: &mut ByteStream) -> io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let len = usize::min(stream.remaining_capacity(), CHUNK_SIZE);
    if stream.input_ended() || len == 0 {
        return Ok(0);
    }

    let mut payload = vec![0u8; len];

    let nread = reader.read(&mut payload).await?;
    if nread == 0 {
        stream.end_input();
        return Ok(0);
    }

    let accepted = stream.write(&payload[..nread]);
    debug_assert_eq!(accepted, nread);

    Ok(accepted)
}

/// Moves the bytes buffered in the stream into writer only once.
///
/// Returns the number of bytes moved.
pub async fn drain_once<W>(stream: &mut ByteStream, writer: &mut W) -> io::Result<usize>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let len = usize::min(stream.buffer_size(), CHUNK_SIZE);
    if len == 0 {
        return Ok(0);
    }

    let payload = stream.read(len)?;
    writer.write_all(&payload).await?;

    Ok(len)
}

/// Relays everything from reader to writer through a pipe of `capacity`
/// bytes.
///
/// The reading side and the writing side run concurrently. If either side
/// makes no progress for `timeout`, the relay fails with
/// [`ErrorKind::TimedOut`].
///
/// Returns the number of bytes delivered to writer.
pub async fn relay<R, W>(
    reader: &mut R,
    writer: &mut W,
    capacity: usize,
    timeout: Duration,
) -> io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let (mut tx, mut rx) = pipe(capacity);

    let produce = async move {
        let res = copy_until_eof(reader, &mut tx, timeout).await;
        tx.shutdown().await.and(res)
    };

    let consume = async move { copy_until_eof(&mut rx, writer, timeout).await };

    let (written, delivered) = tokio::try_join!(produce, consume)?;
    debug_assert_eq!(written, delivered);

    log::debug!("Relay done: {} bytes", delivered);

    Ok(delivered)
}

async fn copy_until_eof<R, W>(
    reader: &mut R,
    writer: &mut W,
    timeout: Duration,
) -> io::Result<usize>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut payload = vec![0u8; CHUNK_SIZE];
    let mut total = 0;

    loop {
        let nread = with_timeout(timeout, reader.read(&mut payload)).await?;
        if nread == 0 {
            break;
        }

        // Every partial write counts as progress.
        let mut offset = 0;
        while offset < nread {
            let nwrite = with_timeout(timeout, writer.write(&payload[offset..nread])).await?;
            if nwrite == 0 {
                return Err(ErrorKind::WriteZero.into());
            }

            offset += nwrite;
        }

        total += nread;
    }

    writer.flush().await?;

    Ok(total)
}

async fn with_timeout<F, T>(timeout: Duration, fut: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    tokio::select! {
        _ = tokio::time::sleep(timeout) => {
            Err(
                io::Error::new(
                    ErrorKind::TimedOut,
                    format!("no data in the past {:?}", timeout)
                )
            )
        }
        res = fut => res,
    }
}
