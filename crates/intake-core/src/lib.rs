//! Foundational low-level utilities shared across intake crates.
//!
//! Provides the atomic file-write helper used by ban-list persistence and the
//! time helpers used for temp-file naming and request timestamps.

pub mod atomic_io;
pub mod time_utils;

pub use atomic_io::write_text_atomic;
pub use time_utils::{current_unix_timestamp_ms, local_timestamp_label};
