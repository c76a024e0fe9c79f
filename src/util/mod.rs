//! Byte-level serialization helpers.
//!
//! Variable-length integers and a bounded decode cursor. These are plain
//! encode/decode utilities; they perform no proof validation.

/// Varint codec and decode cursor.
pub mod cursor;

// Re-export
pub use self::cursor::{write_varint, ByteCursor};
