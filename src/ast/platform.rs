//! Platform restrictions (`platforms: [linux, darwin/arm64]`).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;

use super::error::DecodeError;
use super::node::{field, scalar_text};
use super::path::NodePath;

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "arm64", "arm64be", "armbe", "loong64", "mips", "mips64",
    "mips64le", "mips64p32", "mips64p32le", "mipsle", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

/// An operating system and/or architecture a command is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    /// Operating system, e.g. `linux`.
    pub os: Option<String>,
    /// Architecture, e.g. `amd64`.
    pub arch: Option<String>,
}

impl Platform {
    /// Parses `os`, `arch` or `os/arch`.
    ///
    /// # Errors
    ///
    /// Returns a message naming the part that is not a known OS or arch.
    pub fn parse(input: &str) -> Result<Self, String> {
        let parts: Vec<&str> = input.split('/').collect();
        if parts.len() > 2 {
            return Err(format!("invalid platform: {input}"));
        }

        let mut platform = Self::default();
        let first = parts[0];
        if first.is_empty() {
            return Err("invalid platform: empty".to_string());
        }
        if KNOWN_OS.contains(&first) {
            platform.os = Some(first.to_string());
        } else if KNOWN_ARCH.contains(&first) {
            platform.arch = Some(first.to_string());
        } else {
            return Err(format!("invalid OS or arch: {first}"));
        }

        if let Some(&arch) = parts.get(1) {
            if platform.os.is_none() || !KNOWN_ARCH.contains(&arch) {
                return Err(format!("invalid platform arch: {arch}"));
            }
            platform.arch = Some(arch.to_string());
        }
        Ok(platform)
    }

    /// Decodes one entry of a `platforms:` list.
    ///
    /// # Errors
    ///
    /// Returns a decode error for non-scalar nodes and unknown platforms.
    pub fn decode(node: &Value, path: &NodePath) -> Result<Self, DecodeError> {
        let Some(text) = scalar_text(node) else {
            return Err(DecodeError::new(path).with_type_message("platform", node));
        };
        Self::parse(&text).map_err(|message| DecodeError::new(path).with_message(message))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.os, &self.arch) {
            (Some(os), Some(arch)) => write!(f, "{os}/{arch}"),
            (Some(os), None) => f.write_str(os),
            (None, Some(arch)) => f.write_str(arch),
            (None, None) => Ok(()),
        }
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = Value::deserialize(deserializer)?;
        Self::decode(&node, &NodePath::root()).map_err(serde::de::Error::custom)
    }
}

/// Decodes the optional `platforms` list of a command mapping.
///
/// Each entry becomes a shared, immutable platform entity.
///
/// # Errors
///
/// Returns a decode error when the field is not a list or an entry is invalid.
pub fn decode_platforms(
    map: &serde_yaml::Mapping,
    path: &NodePath,
) -> Result<Vec<Arc<Platform>>, DecodeError> {
    let Some(value) = field(map, "platforms") else {
        return Ok(Vec::new());
    };
    let list_path = path.key("platforms");
    let Value::Sequence(items) = value else {
        return Err(DecodeError::new(&list_path).with_type_message("[]platform", value));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| Platform::decode(item, &list_path.index(i)).map(Arc::new))
        .collect()
}
