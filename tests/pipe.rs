use std::{io::ErrorKind, time::Duration};

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use byte_stream::{
    io::{drain_once, fill_once, relay},
    pipe::pipe,
    ByteStream,
};

#[tokio::test]
async fn test_backpressure() {
    let (mut tx, mut rx) = pipe(4);

    // Nobody reads, so only the first 4 bytes fit.
    let res = tokio::time::timeout(Duration::from_millis(50), tx.write_all(b"0123456789")).await;
    assert!(res.is_err());
    assert_eq!(tx.bytes_written(), 4);

    let mut buf = [0u8; 8];
    let n = rx.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"0123");
    assert_eq!(rx.bytes_read(), 4);
}

#[tokio::test]
async fn test_transfer_between_tasks() {
    let (mut tx, mut rx) = pipe(7);
    let payload: Vec<u8> = (0..10_000u32).map(|x| x as u8).collect();

    let expected = payload.clone();
    let producer = tokio::spawn(async move {
        tx.write_all(&payload).await.unwrap();
        tx.shutdown().await.unwrap();
    });

    let mut received = Vec::new();
    rx.read_to_end(&mut received).await.unwrap();
    producer.await.unwrap();

    assert_eq!(received, expected);
}

#[tokio::test]
async fn test_eof_after_writer_dropped() {
    let (mut tx, mut rx) = pipe(8);

    tx.write_all(b"abc").await.unwrap();
    drop(tx);

    let mut received = Vec::new();
    rx.read_to_end(&mut received).await.unwrap();

    assert_eq!(received, b"abc");
    assert_eq!(rx.read(&mut [0u8; 4]).await.unwrap(), 0);
}

#[tokio::test]
async fn test_write_after_shutdown() {
    let (mut tx, _rx) = pipe(8);

    tx.shutdown().await.unwrap();
    let e = tx.write(b"abc").await.unwrap_err();

    assert_eq!(e.kind(), ErrorKind::BrokenPipe);
}

#[tokio::test]
async fn test_write_after_reader_dropped() {
    let (mut tx, rx) = pipe(8);

    drop(rx);
    let e = tx.write(b"abc").await.unwrap_err();

    assert_eq!(e.kind(), ErrorKind::BrokenPipe);
}

#[tokio::test]
async fn test_fill_and_drain() {
    let mut stream = ByteStream::new(8);
    let mut reader: &[u8] = b"hello world";
    let mut writer = Vec::new();

    assert_eq!(fill_once(&mut reader, &mut stream).await.unwrap(), 8);
    assert_eq!(fill_once(&mut reader, &mut stream).await.unwrap(), 0);
    assert!(!stream.input_ended());

    assert_eq!(drain_once(&mut stream, &mut writer).await.unwrap(), 8);
    assert_eq!(fill_once(&mut reader, &mut stream).await.unwrap(), 3);
    assert_eq!(fill_once(&mut reader, &mut stream).await.unwrap(), 0);
    assert!(stream.input_ended());

    assert_eq!(drain_once(&mut stream, &mut writer).await.unwrap(), 3);
    assert_eq!(drain_once(&mut stream, &mut writer).await.unwrap(), 0);

    assert!(stream.eof());
    assert!(!stream.error());
    assert_eq!(writer, b"hello world");
}

#[tokio::test]
async fn test_relay_timeout() {
    let (mut idle, _peer) = tokio::io::duplex(64);
    let mut writer = Vec::new();

    let e = relay(&mut idle, &mut writer, 16, Duration::from_millis(50))
        .await
        .unwrap_err();

    assert_eq!(e.kind(), ErrorKind::TimedOut);
}

#[tokio::test]
async fn test_relay_slow_sink() {
    let payload = [7u8; 64];
    let mut reader = &payload[..];
    let (mut writer, mut sink) = tokio::io::duplex(1);

    let drain = tokio::spawn(async move {
        let mut received = Vec::new();
        let mut buf = [0u8; 1];

        loop {
            tokio::time::sleep(Duration::from_millis(10)).await;
            match sink.read(&mut buf).await.unwrap() {
                0 => break,
                n => received.extend_from_slice(&buf[..n]),
            }
        }

        received
    });

    // The whole transfer takes far longer than the timeout, but every
    // single byte arrives well within it.
    let n = relay(&mut reader, &mut writer, 4, Duration::from_millis(100))
        .await
        .unwrap();
    drop(writer);

    assert_eq!(n, payload.len());
    assert_eq!(drain.await.unwrap(), payload);
}
