use anyhow::{Context, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Environment variable the underlying tool reads its config directory from
pub const CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Environment variable overriding the profiles root
pub const PROFILES_ROOT_ENV: &str = "CLAUDE_PROFILES_ROOT";

/// Prefix carried by every profile directory name
pub const PROFILE_PREFIX: &str = "profile_";

pub const SETTINGS_FILE: &str = "settings.json";
pub const CREDENTIALS_FILE: &str = ".credentials.json";

/// All computed paths used by claude-profile
#[derive(Debug, Clone)]
pub struct Paths {
    /// ~/.claude-profiles (or --root / $CLAUDE_PROFILES_ROOT)
    pub profiles_root: PathBuf,
    /// ~/.claude, used when no profile is selected
    pub default_config_dir: PathBuf,
}

impl Paths {
    /// Resolve paths from the home directory, with an optional root override
    pub fn new(root_override: Option<PathBuf>) -> Result<Self> {
        let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
        let home = base_dirs.home_dir();

        let profiles_root = root_override.unwrap_or_else(|| home.join(".claude-profiles"));
        let default_config_dir = home.join(".claude");

        Ok(Self {
            profiles_root,
            default_config_dir,
        })
    }

    /// Directory of a profile, given its canonical name
    pub fn profile_dir(&self, canonical: &str) -> PathBuf {
        self.profiles_root.join(canonical)
    }

    /// Check if a path is directly inside the profiles root
    pub fn is_in_profiles_root(&self, path: &Path) -> bool {
        path.parent() == Some(self.profiles_root.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let paths = Paths::new(None).unwrap();
        assert!(paths.profiles_root.ends_with(".claude-profiles"));
        assert!(paths.default_config_dir.ends_with(".claude"));
    }

    #[test]
    fn test_root_override() {
        let paths = Paths::new(Some(PathBuf::from("/srv/profiles"))).unwrap();
        assert_eq!(paths.profile_dir("profile_work"), PathBuf::from("/srv/profiles/profile_work"));
    }

    #[test]
    fn test_is_in_profiles_root() {
        let paths = Paths::new(Some(PathBuf::from("/srv/profiles"))).unwrap();
        assert!(paths.is_in_profiles_root(&paths.profile_dir("profile_a")));
        assert!(!paths.is_in_profiles_root(&paths.default_config_dir));
        assert!(!paths.is_in_profiles_root(Path::new("/srv/profiles/profile_a/nested")));
    }
}
