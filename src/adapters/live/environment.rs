//! Live environment adapter using `std::env`.

use crate::ports::environment::Environment;

/// Reads the real process environment.
pub struct LiveEnvironment;

impl Environment for LiveEnvironment {
    fn snapshot(&self) -> Vec<String> {
        std::env::vars_os()
            .map(|(name, value)| format!("{}={}", name.to_string_lossy(), value.to_string_lossy()))
            .collect()
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}
