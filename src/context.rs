//! Service context bundling all port trait objects.

use crate::ports::environment::Environment;
use crate::ports::filesystem::FileSystem;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. `live()` wires the
/// real adapters; tests build contexts from in-memory ones.
pub struct ServiceContext {
    /// Filesystem for reading taskfiles and dotenv files.
    pub fs: Box<dyn FileSystem>,
    /// Process environment.
    pub env: Box<dyn Environment>,
}

impl ServiceContext {
    /// Creates a live context backed by the real disk and process environment.
    #[must_use]
    pub fn live() -> Self {
        use crate::adapters::live::{LiveEnvironment, LiveFileSystem};

        Self { fs: Box::new(LiveFileSystem), env: Box::new(LiveEnvironment) }
    }

    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(fs: Box<dyn FileSystem>, env: Box<dyn Environment>) -> Self {
        Self { fs, env }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::adapters::memory::{MemoryEnvironment, MemoryFileSystem};

    #[test]
    fn explicit_context_uses_given_adapters() {
        let ctx = ServiceContext::new(
            Box::new(MemoryFileSystem::new().with_file("/t.yml", "tasks: {}")),
            Box::new(MemoryEnvironment::new(["A=1"])),
        );
        assert!(ctx.fs.exists(Path::new("/t.yml")));
        assert_eq!(ctx.env.var("A").as_deref(), Some("1"));
    }
}
