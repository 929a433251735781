//! Filesystem utilities for promptvault.
//!
//! Snapshot files must never be observable half-written, so every write
//! goes through [`atomic_write`].

pub mod atomic;

pub use atomic::atomic_write;
pub use atomic::atomic_write_file;
