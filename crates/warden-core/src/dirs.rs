//! Directory scaffolding for the Warden home directory.
//!
//! Global state lives at `~/.warden/` (or `$WARDEN_HOME`):
//!
//! ```text
//! ~/.warden/
//! ├── confirmations/     (one JSON file per pending/resolved confirmation)
//! └── warden.toml        (control-plane config)
//! ```

use std::io;
use std::path::{Path, PathBuf};

/// Global Warden home directory (`~/.warden/` or `$WARDEN_HOME`).
#[derive(Debug, Clone)]
pub struct WardenHome {
    root: PathBuf,
}

impl WardenHome {
    /// Resolve the home directory.
    ///
    /// Checks `$WARDEN_HOME` first, then falls back to `$HOME/.warden/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `$WARDEN_HOME` is relative, or if neither
    /// `$WARDEN_HOME` nor `$HOME` is set.
    pub fn resolve() -> io::Result<Self> {
        let root = if let Ok(custom) = std::env::var("WARDEN_HOME") {
            let p = PathBuf::from(&custom);
            if !p.is_absolute() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "WARDEN_HOME must be an absolute path",
                ));
            }
            p
        } else {
            let home = std::env::var("HOME").map_err(|_| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "neither WARDEN_HOME nor HOME environment variable is set",
                )
            })?;
            PathBuf::from(home).join(".warden")
        };

        Ok(Self { root })
    }

    /// Create a home rooted at an explicit path (tests, embedded use).
    #[must_use]
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding confirmation backing files.
    #[must_use]
    pub fn confirmations_dir(&self) -> PathBuf {
        self.root.join("confirmations")
    }

    /// Path of the control-plane config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.root.join("warden.toml")
    }

    /// Ensure the directory tree exists.
    ///
    /// # Errors
    ///
    /// Returns any error from directory creation.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(self.confirmations_dir())
    }
}
