//! Core profile management logic.
//!
//! This module handles the data model of profiles:
//! - Normalizing and validating profile names
//! - Listing profiles and reporting the active one
//! - Creating profiles and switching the active selection
//! - Locating settings for editing and diffing two profiles
//!
//! Storage goes through a [`ProfileRepository`]; the active selection is passed
//! in explicitly rather than read from the environment.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ProfileError;
use crate::paths::{CREDENTIALS_FILE, PROFILE_PREFIX, Paths, SETTINGS_FILE};
use crate::repository::{FsRepository, ProfileRepository};
use crate::selection::ActiveSelection;
use crate::settings::Settings;

/// Canonical form of a profile name: `profile_` is prepended unless present
pub fn resolve_name(raw: &str) -> String {
    if raw.starts_with(PROFILE_PREFIX) {
        raw.to_string()
    } else {
        format!("{PROFILE_PREFIX}{raw}")
    }
}

/// Whether a directory name follows the `profile_<name>` pattern
pub fn is_profile_name(name: &str) -> bool {
    name.len() > PROFILE_PREFIX.len() && name.starts_with(PROFILE_PREFIX)
}

/// Validate a canonical profile name
///
/// The part after the prefix must be non-empty and must not be able to
/// escape the profiles root.
pub fn validate_name(canonical: &str) -> Result<(), ProfileError> {
    let invalid = |reason| ProfileError::InvalidName {
        name: canonical.to_string(),
        reason,
    };

    let Some(short) = canonical.strip_prefix(PROFILE_PREFIX) else {
        return Err(invalid("missing profile_ prefix"));
    };
    if short.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if short == "." || short == ".." {
        return Err(invalid("name cannot be . or .."));
    }
    if short.contains(['/', '\\', '\0']) {
        return Err(invalid("name cannot contain path separators"));
    }
    Ok(())
}

/// A profile as seen by `list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Canonical name, e.g. `profile_work`
    pub name: String,
    pub dir: PathBuf,
    pub has_credentials: bool,
    /// Whether this profile is the active selection
    pub active: bool,
}

/// Name reported by `current`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveName {
    Named(String),
    /// Nothing selected, or the selected directory is not a profile
    ImplicitDefault,
}

impl fmt::Display for ActiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveName::Named(name) => f.write_str(name),
            ActiveName::ImplicitDefault => f.write_str("(default)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CurrentProfile {
    pub name: ActiveName,
    pub config_dir: PathBuf,
    /// Raw settings document, if the file exists
    pub settings: Option<String>,
    pub has_credentials: bool,
}

#[derive(Debug, Clone)]
pub struct ProfileDetails {
    pub profile: Profile,
    pub settings_path: PathBuf,
    pub settings_modified: Option<DateTime<Utc>>,
    /// Number of `permissions.allow` rules, when the document parses
    pub allow_rules: Option<usize>,
}

/// Profile lifecycle operations over a repository
#[derive(Debug, Clone)]
pub struct ProfileStore<R = FsRepository> {
    repo: R,
    default_config_dir: PathBuf,
}

impl ProfileStore<FsRepository> {
    /// Store backed by the filesystem layout in `paths`
    pub fn open(paths: &Paths) -> Self {
        Self::new(
            FsRepository::new(&paths.profiles_root),
            paths.default_config_dir.clone(),
        )
    }
}

impl<R: ProfileRepository> ProfileStore<R> {
    pub fn new(repo: R, default_config_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            default_config_dir: default_config_dir.into(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn root(&self) -> &Path {
        self.repo.root()
    }

    /// All profiles, annotated with credentials and active flags
    pub fn list(&self, selection: &ActiveSelection) -> Result<Vec<Profile>, ProfileError> {
        let names = self.repo.list()?;
        tracing::debug!(root = %self.root().display(), count = names.len(), "listed profiles");
        Ok(names
            .into_iter()
            .map(|name| self.profile(name, selection))
            .collect())
    }

    /// Canonical names of all profiles
    pub fn names(&self) -> Result<Vec<String>, ProfileError> {
        self.repo.list()
    }

    /// Report what the active selection points at
    pub fn current(&self, selection: &ActiveSelection) -> Result<CurrentProfile, ProfileError> {
        let config_dir = selection
            .config_dir()
            .unwrap_or(self.default_config_dir.as_path())
            .to_path_buf();

        let name = match selection
            .config_dir()
            .and_then(|dir| dir.file_name())
            .and_then(|n| n.to_str())
        {
            Some(base) if is_profile_name(base) => ActiveName::Named(base.to_string()),
            _ => ActiveName::ImplicitDefault,
        };

        let settings_path = config_dir.join(SETTINGS_FILE);
        let settings = match self.repo.read_file(&settings_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %settings_path.display(), error = %e, "unreadable settings");
                None
            }
        };
        let has_credentials = self.repo.file_exists(&config_dir.join(CREDENTIALS_FILE));

        Ok(CurrentProfile {
            name,
            config_dir,
            settings,
            has_credentials,
        })
    }

    /// Point the selection at an existing profile.
    ///
    /// On failure the selection is left untouched and the error carries the
    /// names of every existing profile.
    pub fn use_profile(
        &self,
        selection: &mut ActiveSelection,
        raw: &str,
    ) -> Result<Profile, ProfileError> {
        let canonical = self.existing(raw)?;
        let dir = self.repo.profile_dir(&canonical);
        tracing::info!(profile = %canonical, dir = %dir.display(), "selecting profile");
        selection.select(dir);
        Ok(self.profile(canonical, selection))
    }

    /// Create a profile with the default settings document and no credentials
    pub fn create(&mut self, raw: &str) -> Result<Profile, ProfileError> {
        let canonical = resolve_name(raw);
        validate_name(&canonical)?;

        if self.repo.exists(&canonical) {
            return Err(ProfileError::AlreadyExists(canonical));
        }

        let document = Settings::default_document()?;
        let dir = self.repo.create(&canonical, &document)?;
        tracing::info!(profile = %canonical, dir = %dir.display(), "created profile");

        Ok(Profile {
            name: canonical,
            dir,
            has_credentials: false,
            active: false,
        })
    }

    /// Path of a profile's settings document, for handing to an editor
    pub fn edit(&self, raw: &str) -> Result<PathBuf, ProfileError> {
        let canonical = resolve_name(raw);
        validate_name(&canonical)?;

        let path = self.settings_path(&canonical);
        if !self.repo.file_exists(&path) {
            return Err(ProfileError::SettingsNotFound { path });
        }
        Ok(path)
    }

    /// Unified line diff of two profiles' settings; empty when identical
    pub fn diff(&self, raw_a: &str, raw_b: &str) -> Result<String, ProfileError> {
        let (name_a, old) = self.read_settings(raw_a)?;
        let (name_b, new) = self.read_settings(raw_b)?;

        if old == new {
            return Ok(String::new());
        }

        let diff = similar::TextDiff::from_lines(&old, &new);
        Ok(diff
            .unified_diff()
            .context_radius(3)
            .header(
                &format!("{name_a}/{SETTINGS_FILE}"),
                &format!("{name_b}/{SETTINGS_FILE}"),
            )
            .to_string())
    }

    /// Detailed view of one profile
    pub fn inspect(
        &self,
        raw: &str,
        selection: &ActiveSelection,
    ) -> Result<ProfileDetails, ProfileError> {
        let canonical = self.existing(raw)?;
        let settings_path = self.settings_path(&canonical);

        let allow_rules = self
            .repo
            .read_file(&settings_path)?
            .and_then(|content| Settings::parse(&content).ok())
            .map(|s| s.permissions.allow.len());

        Ok(ProfileDetails {
            settings_modified: self.repo.modified(&settings_path),
            settings_path,
            allow_rules,
            profile: self.profile(canonical, selection),
        })
    }

    fn settings_path(&self, canonical: &str) -> PathBuf {
        self.repo.profile_dir(canonical).join(SETTINGS_FILE)
    }

    /// Resolve a raw name to a profile that must exist
    ///
    /// A name that fails validation cannot name a profile directory, so it is
    /// reported as not found like any other missing profile.
    fn existing(&self, raw: &str) -> Result<String, ProfileError> {
        let canonical = resolve_name(raw);

        if validate_name(&canonical).is_err() || !self.repo.exists(&canonical) {
            tracing::debug!(profile = %canonical, "profile not found");
            return Err(ProfileError::ProfileNotFound {
                name: canonical,
                available: self.repo.list()?,
            });
        }
        Ok(canonical)
    }

    fn read_settings(&self, raw: &str) -> Result<(String, String), ProfileError> {
        let canonical = resolve_name(raw);
        validate_name(&canonical)?;

        let path = self.settings_path(&canonical);
        match self.repo.read_file(&path)? {
            Some(content) => Ok((canonical, content)),
            None => Err(ProfileError::SettingsNotFound { path }),
        }
    }

    fn profile(&self, name: String, selection: &ActiveSelection) -> Profile {
        let dir = self.repo.profile_dir(&name);
        Profile {
            has_credentials: self.repo.file_exists(&dir.join(CREDENTIALS_FILE)),
            active: selection.config_dir() == Some(dir.as_path()),
            name,
            dir,
        }
    }
}
