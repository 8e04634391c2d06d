// src/config.rs

//! Construction-time session settings.
//!
//! The interpreter has no runtime flags that change its semantics; library
//! users (and tests) build a [`SessionConfig`] when creating a session.

/// Default ring buffer capacity, also used as the read chunk size.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Default line that ends the session.
pub const DEFAULT_TERMINATION_TOKEN: &str = "EXIT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Ring buffer capacity in bytes (must be >= 1).
    pub capacity: usize,
    /// Control line that terminates the session.
    pub termination_token: String,
}

impl SessionConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            termination_token: DEFAULT_TERMINATION_TOKEN.to_string(),
        }
    }
}
