//! Async front end over the blocking decoder.
//!
//! There is one decode algorithm, and it is blocking. This module runs it on
//! a `spawn_blocking` worker and bridges bytes in and out over bounded
//! channels, exposing the result as a [`tokio::io::AsyncRead`]. Dropping the
//! [`AsyncLhDecoder`] closes both channels, which stops the worker the next
//! time it needs input or has output to hand over.
//!
//! # Feature Flag
//!
//! This module is only available when the `async-io` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! lhx-codec = { version = "0.1", features = ["async-io"] }
//! ```

use crate::config::DecoderConfig;
use crate::decode::LhDecoder;
use std::io::{self, Read};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tokio::sync::mpsc;

/// Chunk size for feeding compressed input to the worker (8KB).
const INPUT_CHUNK: usize = 8 * 1024;

/// Chunk size for decoded output handed back from the worker (32KB).
const OUTPUT_CHUNK: usize = 32 * 1024;

/// Depth of the input and output channels.
const CHANNEL_DEPTH: usize = 4;

/// Blocking `Read` over a channel of input chunks.
///
/// An input error on the async side closes the channel early; the decoder
/// then sees end of input and reports truncation at the bit position it
/// reached.
struct ChannelSource {
    rx: mpsc::Receiver<Vec<u8>>,
    current: Vec<u8>,
    pos: usize,
}

impl Read for ChannelSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos >= self.current.len() {
            match self.rx.blocking_recv() {
                Some(chunk) => {
                    self.current = chunk;
                    self.pos = 0;
                }
                None => return Ok(0),
            }
        }
        let n = (self.current.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.current[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Async handle to a running decode session.
///
/// Created by [`AsyncLhDecoder::spawn`]; read decoded bytes through the
/// [`AsyncRead`] impl. Must be used inside a Tokio runtime.
#[derive(Debug)]
pub struct AsyncLhDecoder {
    output: mpsc::Receiver<io::Result<Vec<u8>>>,
    current: Vec<u8>,
    pos: usize,
    done: bool,
}

impl AsyncLhDecoder {
    /// Start a decode session over an async byte source.
    ///
    /// `source` must be positioned at the first compressed byte. A feeder
    /// task pulls from it while a blocking worker runs the decoder; both
    /// stop when this handle is dropped.
    pub fn spawn<S>(source: S, config: DecoderConfig, output_size: u64) -> Self
    where
        S: AsyncRead + Send + Unpin + 'static,
    {
        let (in_tx, in_rx) = mpsc::channel::<Vec<u8>>(CHANNEL_DEPTH);
        let (out_tx, out_rx) = mpsc::channel::<io::Result<Vec<u8>>>(CHANNEL_DEPTH);

        tokio::spawn(feed_input(source, in_tx));

        tokio::task::spawn_blocking(move || {
            let source = ChannelSource {
                rx: in_rx,
                current: Vec::new(),
                pos: 0,
            };
            let mut decoder = LhDecoder::new(source, config, output_size);
            let mut chunk = vec![0u8; OUTPUT_CHUNK];

            loop {
                match decoder.fill(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => {
                        if out_tx.blocking_send(Ok(chunk[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = out_tx.blocking_send(Err(e.into()));
                        break;
                    }
                }
            }
        });

        Self {
            output: out_rx,
            current: Vec::new(),
            pos: 0,
            done: false,
        }
    }
}

/// Pump the async source into the worker's input channel.
async fn feed_input<S>(mut source: S, tx: mpsc::Sender<Vec<u8>>)
where
    S: AsyncRead + Send + Unpin + 'static,
{
    let mut buf = vec![0u8; INPUT_CHUNK];
    loop {
        match source.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).await.is_err() {
                    break;
                }
            }
        }
    }
}

impl AsyncRead for AsyncLhDecoder {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        loop {
            if this.pos < this.current.len() {
                let n = (this.current.len() - this.pos).min(buf.remaining());
                buf.put_slice(&this.current[this.pos..this.pos + n]);
                this.pos += n;
                return Poll::Ready(Ok(()));
            }
            if this.done {
                return Poll::Ready(Ok(()));
            }
            match this.output.poll_recv(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    this.current = chunk;
                    this.pos = 0;
                }
                Poll::Ready(Some(Err(e))) => {
                    this.done = true;
                    return Poll::Ready(Err(e));
                }
                Poll::Ready(None) => {
                    this.done = true;
                    return Poll::Ready(Ok(()));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
