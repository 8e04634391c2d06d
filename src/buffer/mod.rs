// src/buffer/mod.rs

//! Bounded streaming tokenizer.
//!
//! - [`ring`] holds the fixed-capacity circular byte buffer and its
//!   "next complete element" query.
//! - [`reader`] drives the ring buffer from an async byte source and surfaces
//!   complete lines (or other delimiter-terminated elements).

pub mod reader;
pub mod ring;

pub use reader::ElementReader;
pub use ring::RingBuffer;
