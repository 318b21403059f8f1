//! Port traits defining external boundaries.
//!
//! The decoder and composer are pure; only the CLI and configuration
//! loading touch the outside world, and they do it through these traits.
//! Implementations live in `src/adapters/`.

pub mod environment;
pub mod filesystem;

pub use environment::Environment;
pub use filesystem::FileSystem;
