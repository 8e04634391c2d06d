// src/buffer/reader.rs

//! Incremental element extraction from an async byte source.

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace, warn};

use crate::buffer::ring::{RingBuffer, alloc_bytes};
use crate::errors::Result;

/// Pulls bytes from `source` in bounded chunks into a [`RingBuffer`] and
/// hands out complete delimiter-terminated elements.
///
/// - A read never asks for more than the buffer's free space, so an element
///   that fits in the buffer is never split or corrupted by chunk
///   boundaries.
/// - A zero-length read marks end-of-stream; trailing bytes without a
///   delimiter are then returned as a final element.
/// - If the buffer fills up without a delimiter, the buffered bytes are
///   returned as a truncated element and the rest of that element is
///   discarded up to and including its delimiter.
#[derive(Debug)]
pub struct ElementReader<R> {
    source: R,
    ring: RingBuffer,
    chunk: Box<[u8]>,
    end_of_stream: bool,
    /// Set after a truncated element was handed out; cleared once the
    /// over-long element's delimiter has been dropped.
    discarding: bool,
}

impl<R: AsyncRead + Unpin> ElementReader<R> {
    /// Wrap `source` with a ring buffer (and read chunk) of `capacity` bytes.
    pub fn new(source: R, capacity: usize) -> Result<Self> {
        let ring = RingBuffer::with_capacity(capacity)?;
        let chunk = alloc_bytes(capacity)?;
        Ok(Self {
            source,
            ring,
            chunk,
            end_of_stream: false,
            discarding: false,
        })
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Whether the source has reported end-of-stream. Buffered elements may
    /// still be pending.
    pub fn end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    /// Next complete element for `delimiter`, including the delimiter when
    /// present. `Ok(None)` means the stream is exhausted.
    pub async fn next_element(&mut self, delimiter: u8) -> Result<Option<Vec<u8>>> {
        loop {
            if self.discarding {
                if self.ring.discard_through(delimiter) {
                    self.discarding = false;
                    debug!("resynchronised after over-long element");
                } else if self.end_of_stream {
                    return Ok(None);
                } else {
                    self.fill().await?;
                    continue;
                }
            }

            let size = self.ring.next_element_size(delimiter, self.end_of_stream);
            if size > 0 {
                return Ok(Some(self.ring.pop_element(size)));
            }

            if self.end_of_stream {
                return Ok(None);
            }

            if self.ring.free_space() == 0 {
                warn!(
                    capacity = self.ring.capacity(),
                    "element exceeds buffer capacity; truncating"
                );
                self.discarding = true;
                let len = self.ring.len();
                return Ok(Some(self.ring.pop_element(len)));
            }

            self.fill().await?;
        }
    }

    /// Next line with its trailing `\n` removed. Invalid UTF-8 is replaced
    /// lossily.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        let Some(mut element) = self.next_element(b'\n').await? else {
            return Ok(None);
        };
        if element.last() == Some(&b'\n') {
            element.pop();
        }
        Ok(Some(String::from_utf8_lossy(&element).into_owned()))
    }

    /// Perform one bounded read into the ring buffer.
    async fn fill(&mut self) -> Result<()> {
        let want = self.chunk.len().min(self.ring.free_space());
        let n = self.source.read(&mut self.chunk[..want]).await?;
        if n == 0 {
            debug!("byte source reached end of stream");
            self.end_of_stream = true;
            return Ok(());
        }

        let accepted = self.ring.push_slice(&self.chunk[..n]);
        if accepted < n {
            warn!(dropped = n - accepted, "ring buffer full; dropping input bytes");
        }
        trace!(read = n, buffered = self.ring.len(), "filled ring buffer");
        Ok(())
    }
}
