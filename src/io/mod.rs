//! I/O operations module
//!
//! Contains the benchmark's I/O buffer and the platform-specific call that
//! turns off read caching on an open file.

pub mod buffer;
pub mod nocache;

pub use buffer::IoBuffer;
pub use nocache::disable_read_cache;
