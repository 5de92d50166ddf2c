//! Filesystem helpers.

mod fs;

pub use fs::write_atomic;
