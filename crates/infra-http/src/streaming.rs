//! Streamed request bodies
//!
//! The envelope is serialized on a blocking task into fixed-size chunks that
//! flow through a bounded channel into the request body, so the serialized
//! JSON is never held whole. The envelope's params stay in memory as a
//! `serde_json::Value` tree until the body is written.

use futures::channel::mpsc;
use futures::executor::block_on;
use futures::SinkExt;
use readsutils_core::RequestEnvelope;
use std::io::{self, Write};

/// Bytes per body chunk
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Chunks buffered between serializer and socket
const CHANNEL_DEPTH: usize = 4;

type Chunk = io::Result<Vec<u8>>;

/// Request body that serializes `envelope` while it is being sent
pub fn envelope_body(envelope: RequestEnvelope) -> reqwest::Body {
    reqwest::Body::wrap_stream(envelope_chunks(envelope))
}

/// Serialize `envelope` into a stream of chunks (must run inside a tokio runtime)
pub fn envelope_chunks(envelope: RequestEnvelope) -> mpsc::Receiver<Chunk> {
    let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);

    tokio::task::spawn_blocking(move || {
        let mut writer = ChunkWriter::new(tx.clone());
        let written = serde_json::to_writer(&mut writer, &envelope)
            .map_err(io::Error::from)
            .and_then(|_| writer.flush());

        match written {
            Ok(()) => {}
            // Receiver gone: the request was abandoned
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!("Streamed request body abandoned by transport");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize streamed request body");
                let mut tx = tx;
                let _ = block_on(tx.send(Err(e)));
            }
        }
    });

    rx
}

struct ChunkWriter {
    tx: mpsc::Sender<Chunk>,
    buf: Vec<u8>,
}

impl ChunkWriter {
    fn new(tx: mpsc::Sender<Chunk>) -> Self {
        Self {
            tx,
            buf: Vec::with_capacity(CHUNK_SIZE),
        }
    }

    fn send_buffered(&mut self) -> io::Result<()> {
        let chunk = std::mem::replace(&mut self.buf, Vec::with_capacity(CHUNK_SIZE));
        block_on(self.tx.send(Ok(chunk))).map_err(|_| {
            io::Error::new(io::ErrorKind::BrokenPipe, "request body receiver dropped")
        })
    }
}

impl Write for ChunkWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let taken = data.len().min(CHUNK_SIZE - self.buf.len());
        self.buf.extend_from_slice(&data[..taken]);
        if self.buf.len() == CHUNK_SIZE {
            self.send_buffered()?;
        }
        Ok(taken)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        self.send_buffered()
    }
}
