//! Environment port for reading process environment variables.

/// Provides the variables a spawned command would inherit.
pub trait Environment: Send + Sync {
    /// Returns every variable as a `NAME=value` entry, in a stable order.
    fn snapshot(&self) -> Vec<String>;

    /// Looks up a single variable.
    fn var(&self, name: &str) -> Option<String>;
}
