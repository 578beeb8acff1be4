//! The active profile selection.
//!
//! The underlying tool reads `CLAUDE_CONFIG_DIR` to find its config directory.
//! We read that variable once at startup into an [`ActiveSelection`] and pass
//! it around explicitly; nothing below `main` touches the process environment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::paths::CONFIG_DIR_ENV;

/// Which config directory is currently selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSelection {
    config_dir: Option<PathBuf>,
}

impl ActiveSelection {
    /// No selection: the implicit default directory is active
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: Some(config_dir.into()),
        }
    }

    /// Read the selection from `CLAUDE_CONFIG_DIR`
    pub fn from_env() -> Self {
        Self::from_value(std::env::var_os(CONFIG_DIR_ENV))
    }

    /// Build a selection from a raw variable value; empty counts as unset
    pub fn from_value(value: Option<OsString>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::new(v),
            _ => Self::unset(),
        }
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.config_dir.is_some()
    }

    pub(crate) fn select(&mut self, dir: PathBuf) {
        self.config_dir = Some(dir);
    }
}
