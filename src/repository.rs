//! Storage seam for profiles.
//!
//! [`ProfileStore`](crate::profiles::ProfileStore) only ever asks a repository
//! whether a profile exists, creates one, reads a file, or lists names.
//! [`FsRepository`] does that against the real profiles root and
//! [`MemoryRepository`] keeps everything in maps for tests.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ProfileError;
use crate::paths::SETTINGS_FILE;
use crate::profiles::is_profile_name;

pub trait ProfileRepository {
    /// Directory holding every profile
    fn root(&self) -> &Path;

    /// Canonical names of all profiles, in enumeration order
    fn list(&self) -> Result<Vec<String>, ProfileError>;

    fn exists(&self, canonical: &str) -> bool;

    /// Create the profile directory and its settings file.
    ///
    /// Fails with [`ProfileError::AlreadyExists`] if the directory is already
    /// there; of two concurrent creators only one succeeds.
    fn create(&mut self, canonical: &str, settings: &str) -> Result<PathBuf, ProfileError>;

    /// Contents of a file, or `None` if it does not exist
    fn read_file(&self, path: &Path) -> Result<Option<String>, ProfileError>;

    fn file_exists(&self, path: &Path) -> bool;

    /// Last modification time of a file, if known
    fn modified(&self, path: &Path) -> Option<DateTime<Utc>>;

    fn profile_dir(&self, canonical: &str) -> PathBuf {
        self.root().join(canonical)
    }
}

/// Profiles stored as directories on disk
#[derive(Debug, Clone)]
pub struct FsRepository {
    root: PathBuf,
}

impl FsRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ProfileRepository for FsRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn list(&self) -> Result<Vec<String>, ProfileError> {
        if self.root.exists() && !self.root.is_dir() {
            tracing::warn!(root = %self.root.display(), "profiles root is not a directory");
            return Ok(Vec::new());
        }

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ProfileError::io(&self.root, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ProfileError::io(&self.root, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && is_profile_name(name)
            {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn exists(&self, canonical: &str) -> bool {
        self.profile_dir(canonical).is_dir()
    }

    fn create(&mut self, canonical: &str, settings: &str) -> Result<PathBuf, ProfileError> {
        fs::create_dir_all(&self.root).map_err(|e| ProfileError::io(&self.root, e))?;

        let dir = self.profile_dir(canonical);
        // Non-recursive create_dir is the exclusive step
        if let Err(e) = fs::create_dir(&dir) {
            return Err(match e.kind() {
                ErrorKind::AlreadyExists => ProfileError::AlreadyExists(canonical.to_string()),
                _ => ProfileError::io(&dir, e),
            });
        }

        let settings_path = dir.join(SETTINGS_FILE);
        if let Err(e) = fs::write(&settings_path, settings) {
            // Leave nothing half-created behind
            if let Err(cleanup) = fs::remove_dir_all(&dir) {
                tracing::warn!(dir = %dir.display(), error = %cleanup, "failed to remove partial profile");
            }
            return Err(ProfileError::io(&settings_path, e));
        }

        Ok(dir)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>, ProfileError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ProfileError::io(path, e)),
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
        Some(modified.into())
    }
}

/// In-memory repository; profiles are listed in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    root: PathBuf,
    profiles: Vec<String>,
    files: HashMap<PathBuf, (String, DateTime<Utc>)>,
}

impl MemoryRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Seed a profile directory, optionally with settings and credentials
    pub fn insert_profile(&mut self, canonical: &str, settings: Option<&str>, credentials: bool) {
        if !self.profiles.iter().any(|p| p == canonical) {
            self.profiles.push(canonical.to_string());
        }
        let dir = self.profile_dir(canonical);
        if let Some(settings) = settings {
            self.write_file(dir.join(SETTINGS_FILE), settings);
        }
        if credentials {
            self.write_file(dir.join(crate::paths::CREDENTIALS_FILE), "{}");
        }
    }

    pub fn write_file(&mut self, path: impl Into<PathBuf>, content: &str) {
        self.files.insert(path.into(), (content.to_string(), Utc::now()));
    }
}

impl ProfileRepository for MemoryRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn list(&self) -> Result<Vec<String>, ProfileError> {
        Ok(self.profiles.clone())
    }

    fn exists(&self, canonical: &str) -> bool {
        self.profiles.iter().any(|p| p == canonical)
    }

    fn create(&mut self, canonical: &str, settings: &str) -> Result<PathBuf, ProfileError> {
        if self.exists(canonical) {
            return Err(ProfileError::AlreadyExists(canonical.to_string()));
        }
        self.insert_profile(canonical, Some(settings), false);
        Ok(self.profile_dir(canonical))
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>, ProfileError> {
        Ok(self.files.get(path).map(|(content, _)| content.clone()))
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        self.files.get(path).map(|(_, at)| *at)
    }
}
