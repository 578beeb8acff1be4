//! Error types returned by the profile store.
//!
//! Everything below the command layer reports failures as [`ProfileError`] so
//! callers (and tests) can match on the kind. The command layer wraps these in
//! `anyhow` and `main` maps them back to an exit code.

use std::path::PathBuf;

/// Failures surfaced by profile operations
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// A verb that needs a profile name was invoked without one
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// The profile directory does not exist
    #[error("profile '{name}' not found")]
    ProfileNotFound {
        name: String,
        /// Canonical names of every profile that does exist
        available: Vec<String>,
    },

    /// The profile exists (or not) but its settings document is absent
    #[error("settings file not found: {}", path.display())]
    SettingsNotFound { path: PathBuf },

    #[error("profile '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid profile name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("I/O error on {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProfileError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingArgument(_) => 2,
            _ => 1,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound { .. } | Self::SettingsNotFound { .. }
        )
    }
}
