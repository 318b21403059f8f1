//! Process-wide feature toggles ("experiments").
//!
//! An experiment named `NAME` is controlled by `TASK_X_NAME`. The process
//! environment is consulted first, then a `.env` file in the taskfile's
//! directory. The toggles are read once at startup and then passed down
//! explicitly; nothing below the CLI reads them ambiently.

use std::path::Path;

use crate::env::EnvPrecedence;
use crate::error::ConfigError;
use crate::ports::environment::Environment;
use crate::ports::filesystem::FileSystem;

/// Prefix of experiment toggle variables.
pub const EXPERIMENT_PREFIX: &str = "TASK_X_";

/// Name of the experiment letting declared env vars override ambient ones.
pub const ENV_PRECEDENCE: &str = "ENV_PRECEDENCE";

/// Name of the dotenv file read next to the taskfile.
pub const DOTENV_FILE: &str = ".env";

/// The set of experiments and whether each is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Experiments {
    /// Declared environment variables win over ambient ones.
    pub env_precedence: bool,
}

impl Experiments {
    /// Reads experiment toggles from `env` and from `<dir>/.env`.
    ///
    /// # Errors
    ///
    /// Returns an error when the dotenv file exists but cannot be read or
    /// parsed.
    pub fn load(
        env: &dyn Environment,
        fs: &dyn FileSystem,
        dir: &Path,
    ) -> Result<Self, ConfigError> {
        let dotenv = read_dotenv(fs, &dir.join(DOTENV_FILE))?;
        let lookup = |name: &str| {
            let key = format!("{EXPERIMENT_PREFIX}{name}");
            env.var(&key).or_else(|| {
                dotenv.iter().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
            })
        };

        let experiments = Self { env_precedence: enabled(ENV_PRECEDENCE, lookup(ENV_PRECEDENCE)) };
        tracing::debug!(?experiments, "loaded experiments");
        Ok(experiments)
    }

    /// The environment precedence selected by these experiments.
    #[must_use]
    pub fn precedence(&self) -> EnvPrecedence {
        EnvPrecedence::from_declared_wins(self.env_precedence)
    }
}

fn read_dotenv(fs: &dyn FileSystem, path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    if !fs.exists(path) {
        return Ok(Vec::new());
    }
    let contents = fs
        .read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    dotenvy::from_read_iter(contents.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ConfigError::Dotenv { path: path.to_path_buf(), source })
}

fn enabled(name: &str, raw: Option<String>) -> bool {
    match raw.as_deref() {
        None | Some("" | "0") => false,
        Some("1") => true,
        Some(other) => {
            tracing::warn!(
                experiment = name,
                value = other,
                "invalid experiment value, expected 1 or 0; treating as disabled"
            );
            false
        }
    }
}
