//! Diagnostic tool for claude-profile.
//!
//! This module implements the `claude-profile doctor` command, which checks
//! for common issues:
//! - Existence of the profiles root.
//! - Whether `CLAUDE_CONFIG_DIR` points at a real profile.
//! - Presence of each profile's settings.json.
//!
//! It reports issues to the user with a pass/fail/warn status.

use anstyle::AnsiColor;
use std::env;

use crate::paths::{CONFIG_DIR_ENV, Paths};
use crate::profiles::{ProfileStore, is_profile_name};
use crate::repository::ProfileRepository;
use crate::selection::ActiveSelection;
use crate::ui::Ui;

/// Run the doctor diagnostics; returns whether every check passed
pub fn run_doctor<R: ProfileRepository>(
    paths: &Paths,
    store: &ProfileStore<R>,
    selection: &ActiveSelection,
    ui: &Ui,
) -> bool {
    ui.section("claude-profile Doctor");
    ui.newline();

    let mut healthy = true;

    // 1. Profiles root
    healthy &= check_step(ui, "Profiles Root", || {
        if paths.profiles_root.is_dir() {
            ui.println(format!(
                "  {} Profiles root exists: {}",
                ui.icon_ok(),
                paths.profiles_root.display()
            ));
        } else {
            ui.println(format!(
                "  {} Profiles root missing: {} (created by the first 'create')",
                ui.icon_warn(),
                paths.profiles_root.display()
            ));
        }
        true
    });

    // 2. Active selection
    healthy &= check_step(ui, "Active Selection", || {
        let Some(dir) = selection.config_dir() else {
            ui.println(format!(
                "  {} {} not set, using {}",
                ui.icon_info(),
                CONFIG_DIR_ENV,
                paths.default_config_dir.display()
            ));
            return true;
        };

        ui.println(format!("  {} {} = {}", ui.icon_info(), CONFIG_DIR_ENV, dir.display()));
        if !dir.is_dir() {
            ui.println(format!("  {} Selected directory is MISSING", ui.icon_err()));
            return false;
        }

        let named = dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_profile_name);
        if named && paths.is_in_profiles_root(dir) {
            ui.println(format!("  {} Selection is a managed profile", ui.icon_ok()));
        } else {
            ui.println(format!(
                "  {} Selection is outside the profiles root",
                ui.icon_warn()
            ));
        }
        true
    });

    // 3. Profiles
    healthy &= check_step(ui, "Profiles", || {
        let profiles = match store.list(selection) {
            Ok(p) => p,
            Err(e) => {
                ui.println(format!("  {} Failed to list profiles: {}", ui.icon_err(), e));
                return false;
            }
        };

        if profiles.is_empty() {
            ui.println(format!("  {} No profiles found", ui.icon_warn()));
            return true;
        }

        ui.println(format!("  Found {} profiles:", profiles.len()));
        let mut all_valid = true;
        for profile in profiles {
            let creds = if profile.has_credentials { "" } else { " (no credentials)" };
            if store.edit(&profile.name).is_ok() {
                ui.println(format!("    {} {}{}", ui.icon_ok(), profile.name, creds));
            } else {
                ui.println(format!(
                    "    {} {} (settings.json missing)",
                    ui.icon_err(),
                    profile.name
                ));
                all_valid = false;
            }
        }
        all_valid
    });

    // 4. Environment
    check_step(ui, "Environment", || {
        match env::var("VISUAL").or_else(|_| env::var("EDITOR")) {
            Ok(e) => ui.println(format!("  {} Editor set to: {}", ui.icon_ok(), e)),
            Err(_) => ui.println(format!("  {} EDITOR not set (falling back to vi)", ui.icon_info())),
        }
        true
    });

    healthy
}

fn check_step<F>(ui: &Ui, name: &str, check_fn: F) -> bool
where
    F: FnOnce() -> bool,
{
    ui.println(ui.bold(format!("Checking {}...", name)));
    let success = check_fn();
    if !success {
        ui.println(ui.colored("  Issues detected!", AnsiColor::Red));
    }
    ui.newline();
    success
}
