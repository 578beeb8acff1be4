//! Test utilities shared across test modules
//!
//! This module provides common helper functions for testing, avoiding duplication
//! across multiple test suites.

use crate::paths::Paths;
use crate::profiles::ProfileStore;
use crate::repository::{FsRepository, MemoryRepository};
use tempfile::TempDir;

/// Create a Paths struct for testing using a temporary directory
///
/// Mirrors the real ~/.claude-profiles/ and ~/.claude/ layout inside the temp dir.
pub fn setup_test_paths(temp_dir: &TempDir) -> Paths {
    Paths {
        profiles_root: temp_dir.path().join(".claude-profiles"),
        default_config_dir: temp_dir.path().join(".claude"),
    }
}

/// Filesystem-backed store rooted in a temporary directory
pub fn fs_store(temp_dir: &TempDir) -> ProfileStore<FsRepository> {
    ProfileStore::open(&setup_test_paths(temp_dir))
}

/// Empty in-memory store rooted at /profiles
pub fn memory_store() -> ProfileStore<MemoryRepository> {
    ProfileStore::new(MemoryRepository::new("/profiles"), "/home/u/.claude")
}
