// src/buffer/ring.rs

//! Fixed-capacity circular byte buffer with delimiter-aware element lookup.

use crate::errors::{Result, ShellError};

/// Allocate a zeroed byte block of exactly `len` bytes, surfacing allocation
/// failure as an error instead of aborting.
pub(crate) fn alloc_bytes(len: usize) -> Result<Box<[u8]>> {
    let mut storage = Vec::new();
    storage.try_reserve_exact(len)?;
    storage.resize(len, 0);
    Ok(storage.into_boxed_slice())
}

/// Circular byte store of capacity `C`.
///
/// Invariants:
/// - `0 <= len <= C`
/// - `read` and `write` are always in `[0, C)` and wrap modulo `C`
/// - `write == (read + len) % C`
///
/// The buffer never grows. Bytes pushed while it is full are dropped.
#[derive(Debug)]
pub struct RingBuffer {
    storage: Box<[u8]>,
    read: usize,
    write: usize,
    len: usize,
}

impl RingBuffer {
    /// Create an empty buffer holding at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ShellError::InvalidCapacity(capacity));
        }
        Ok(Self {
            storage: alloc_bytes(capacity)?,
            read: 0,
            write: 0,
            len: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bytes that can still be pushed.
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len
    }

    /// Append one byte. Returns `false` (and drops the byte) if the buffer is
    /// full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.free_space() == 0 {
            return false;
        }
        self.storage[self.write] = byte;
        self.write = (self.write + 1) % self.capacity();
        self.len += 1;
        true
    }

    /// Append as many bytes of `bytes` as fit, in order, and return how many
    /// were accepted. The rest are dropped.
    pub fn push_slice(&mut self, bytes: &[u8]) -> usize {
        let accepted = bytes.len().min(self.free_space());
        for &byte in &bytes[..accepted] {
            self.push(byte);
        }
        accepted
    }

    /// Remove and return the oldest byte.
    pub fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        let byte = self.storage[self.read];
        self.read = (self.read + 1) % self.capacity();
        self.len -= 1;
        Some(byte)
    }

    /// Buffered bytes in logical order, starting at the read cursor.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        let cap = self.capacity();
        (0..self.len).map(move |i| self.storage[(self.read + i) % cap])
    }

    /// Length of the next complete element, without consuming anything.
    ///
    /// - If `delimiter` is buffered, returns the index of its first
    ///   occurrence + 1 (the element includes its delimiter).
    /// - Otherwise, if `end_of_stream` is set and bytes are buffered, returns
    ///   the buffered length (a final, delimiter-less element).
    /// - Otherwise returns 0: more input is needed (or nothing is left).
    pub fn next_element_size(&self, delimiter: u8, end_of_stream: bool) -> usize {
        match self.iter().position(|b| b == delimiter) {
            Some(idx) => idx + 1,
            None if end_of_stream => self.len,
            None => 0,
        }
    }

    /// Pop exactly `size` bytes (clamped to what is buffered) into a new
    /// vector.
    pub fn pop_element(&mut self, size: usize) -> Vec<u8> {
        let size = size.min(self.len);
        let mut out = Vec::with_capacity(size);
        for _ in 0..size {
            if let Some(byte) = self.pop() {
                out.push(byte);
            }
        }
        out
    }

    /// Drop buffered bytes up to and including the first `delimiter`.
    ///
    /// Returns `true` if a delimiter was found; otherwise the buffer is
    /// emptied and `false` is returned.
    pub fn discard_through(&mut self, delimiter: u8) -> bool {
        while let Some(byte) = self.pop() {
            if byte == delimiter {
                return true;
            }
        }
        false
    }
}
