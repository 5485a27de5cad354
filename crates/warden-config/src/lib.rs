//! Warden Config - control-plane configuration.
//!
//! All types here are self-contained with no dependencies on other internal
//! warden crates; the composition root converts at the boundary. Every
//! section implements [`Default`] with production-safe values, so a bare
//! `[section]` header in TOML produces a working configuration.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors that can occur loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// The path that failed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// The path that failed.
        path: String,
        /// The TOML diagnostic.
        #[source]
        source: toml::de::Error,
    },
}

/// Root configuration for the Warden control plane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// Audit log retention.
    pub audit: AuditSection,
    /// Action log retention.
    pub actions: ActionsSection,
    /// Dispatch rate limiting.
    pub rate: RateSection,
    /// Command policy seeds.
    pub policy: PolicySection,
    /// Confirmation workflow storage.
    pub confirmations: ConfirmationsSection,
}

impl WardenConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not valid for this schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from a file when it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// A present-but-invalid file is still an error — a typo in config must
    /// not silently fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Audit log retention settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    /// Maximum retained audit entries.
    pub capacity: usize,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

/// Action log retention settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsSection {
    /// Maximum retained action records.
    pub capacity: usize,
}

impl Default for ActionsSection {
    fn default() -> Self {
        Self { capacity: 200 }
    }
}

/// Dispatch rate-limiting settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateSection {
    /// Maximum dispatches per second; 0 disables limiting.
    pub max_per_second: usize,
}

/// Command-policy seed settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    /// Seed the standard destructive-operation blocklist.
    pub use_defaults: bool,
    /// Additional blocked program names.
    pub blocked_programs: Vec<String>,
    /// Additional blocked command patterns (regular expressions).
    pub blocked_patterns: Vec<String>,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            use_defaults: true,
            blocked_programs: Vec::new(),
            blocked_patterns: Vec::new(),
        }
    }
}

/// Confirmation workflow storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationsSection {
    /// Backing directory; defaults to `<warden home>/confirmations`.
    pub dir: Option<PathBuf>,
}
