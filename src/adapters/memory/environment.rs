//! In-memory environment.

use crate::ports::environment::Environment;

/// Environment backed by a fixed list of `NAME=value` entries.
///
/// Entries are kept verbatim and in order, duplicates included; lookups
/// return the last matching entry, the way `exec` consumers resolve them.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvironment {
    entries: Vec<String>,
}

impl MemoryEnvironment {
    /// Builds an environment from `NAME=value` entries.
    #[must_use]
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { entries: entries.into_iter().map(Into::into).collect() }
    }
}

impl Environment for MemoryEnvironment {
    fn snapshot(&self) -> Vec<String> {
        self.entries.clone()
    }

    fn var(&self, name: &str) -> Option<String> {
        self.entries.iter().rev().find_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }
}
