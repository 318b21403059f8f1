//! In-memory adapters for tests and embedding.

pub mod environment;
pub mod filesystem;

pub use environment::MemoryEnvironment;
pub use filesystem::MemoryFileSystem;
