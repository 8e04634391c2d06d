// src/sum.rs

//! Summation utility: adds up the integers stored in a file.
//!
//! - `text`: comma-separated decimal integers, tokenized through the same
//!   ring buffer reader the interpreter uses (capacity = buffer size).
//! - `binary`: native-endian `i32` values, read in chunks of the buffer size
//!   rounded down to whole values.

use std::path::Path;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

use crate::buffer::ElementReader;
use crate::buffer::ring::alloc_bytes;
use crate::errors::{Result, ShellError};

const VALUE_SIZE: usize = std::mem::size_of::<i32>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumFormat {
    Binary,
    Text,
}

/// Open `path` and sum its values with a buffer of `buffer_size` bytes.
pub async fn sum_file(path: &Path, format: SumFormat, buffer_size: usize) -> Result<i64> {
    if buffer_size == 0 {
        return Err(ShellError::InvalidCapacity(0));
    }
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))
        .map_err(ShellError::Other)?;

    debug!(path = %path.display(), ?format, buffer_size, "summing file");
    match format {
        SumFormat::Text => sum_text(file, buffer_size).await,
        SumFormat::Binary => sum_binary(file, buffer_size).await,
    }
}

/// Sum comma-separated integers. Newlines inside a field are removed before
/// parsing, so `"1,2\n3"` sums to `1 + 23`.
pub async fn sum_text<R: AsyncRead + Unpin>(source: R, buffer_size: usize) -> Result<i64> {
    let mut reader = ElementReader::new(source, buffer_size)?;
    let mut sum: i64 = 0;

    while let Some(element) = reader.next_element(b',').await? {
        let field: Vec<u8> = element
            .into_iter()
            .filter(|&b| b != b',' && b != b'\n')
            .collect();
        sum = sum.wrapping_add(parse_leading_i64(&field));
    }

    Ok(sum)
}

/// Sum native-endian `i32` values. A value split across two reads is
/// reassembled; a partial value at end of input is ignored.
pub async fn sum_binary<R: AsyncRead + Unpin>(mut source: R, buffer_size: usize) -> Result<i64> {
    let chunk_size = ((buffer_size / VALUE_SIZE) * VALUE_SIZE).max(VALUE_SIZE);
    let mut chunk = alloc_bytes(chunk_size)?;
    let mut carry: Vec<u8> = Vec::with_capacity(VALUE_SIZE);
    let mut sum: i64 = 0;

    loop {
        let n = source.read(&mut chunk).await?;
        if n == 0 {
            break;
        }

        let mut bytes = &chunk[..n];
        if !carry.is_empty() {
            let need = VALUE_SIZE - carry.len();
            let take = need.min(bytes.len());
            carry.extend_from_slice(&bytes[..take]);
            bytes = &bytes[take..];
            if carry.len() < VALUE_SIZE {
                continue;
            }
            sum += i64::from(i32::from_ne_bytes([carry[0], carry[1], carry[2], carry[3]]));
            carry.clear();
        }

        let mut values = bytes.chunks_exact(VALUE_SIZE);
        for value in &mut values {
            sum += i64::from(i32::from_ne_bytes([value[0], value[1], value[2], value[3]]));
        }
        carry.extend_from_slice(values.remainder());
    }

    if !carry.is_empty() {
        debug!(trailing = carry.len(), "ignoring partial trailing value");
    }
    Ok(sum)
}

/// Lenient integer parse: optional leading whitespace, optional sign, then
/// as many decimal digits as are present. Anything unparsable yields 0 and
/// overflow wraps.
pub fn parse_leading_i64(field: &[u8]) -> i64 {
    let mut bytes = field.iter().copied().skip_while(u8::is_ascii_whitespace).peekable();

    let negative = match bytes.peek() {
        Some(b'-') => {
            bytes.next();
            true
        }
        Some(b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    for b in bytes.take_while(u8::is_ascii_digit) {
        value = value.wrapping_mul(10).wrapping_add(i64::from(b - b'0'));
    }

    if negative { value.wrapping_neg() } else { value }
}
