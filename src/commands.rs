//! High-level command orchestration for the CLI.
//!
//! This module contains the handler functions for each verb (`list`, `use`,
//! `create`, etc.). It serves as the coordination layer between:
//! - `crate::profiles` for the profile store operations.
//! - `crate::ui` for output.
//! - `crate::shell` for the assignment `use` hands back to the shell.
//!
//! Each function here corresponds to a subcommand in `crate::cli`.

use anstyle::AnsiColor;
use anyhow::{Context, Result, bail};
use comfy_table::Table;
use std::path::Path;
use std::process::Command;

use crate::doctor::run_doctor;
use crate::error::ProfileError;
use crate::paths::Paths;
use crate::profiles::{ActiveName, Profile, ProfileStore};
use crate::repository::ProfileRepository;
use crate::selection::ActiveSelection;
use crate::shell::ShellKind;
use crate::ui::Ui;

/// List all profiles
pub fn list<R: ProfileRepository>(
    store: &ProfileStore<R>,
    selection: &ActiveSelection,
    ui: &Ui,
) -> Result<()> {
    let mut profiles = store.list(selection)?;

    if profiles.is_empty() {
        ui.warn(format!("No profiles found in {}", store.root().display()));
        ui.newline();
        ui.println("Create one with:");
        ui.println(format!("  {} create <name>", ui.bold("claude-profile")));
        return Ok(());
    }

    profiles.sort_by(|a, b| a.name.cmp(&b.name));

    ui.section("Profiles");
    ui.println(profile_table(ui, &profiles).to_string());

    if !selection.is_set() {
        ui.info("No profile selected; using the default config directory.");
    }
    Ok(())
}

/// Build the table shown by `list`
fn profile_table(ui: &Ui, profiles: &[Profile]) -> Table {
    let mut table = ui.simple_table();
    table.set_header(vec![
        ui.header_cell(""),
        ui.header_cell("Profile"),
        ui.header_cell("Credentials"),
        ui.header_cell("Directory"),
    ]);

    for profile in profiles {
        let icon = if profile.active { ui.icon_ok() } else { " " };
        let name_cell = if profile.active {
            ui.colored_cell(&profile.name, AnsiColor::Green)
        } else {
            ui.cell(&profile.name)
        };
        let creds_cell = if profile.has_credentials {
            ui.colored_cell("yes", AnsiColor::Green)
        } else {
            ui.cell("-")
        };

        table.add_row(vec![
            ui.cell(icon),
            name_cell,
            creds_cell,
            ui.cell(profile.dir.display().to_string()),
        ]);
    }
    table
}

/// Show the active profile, its config directory and settings
pub fn current<R: ProfileRepository>(
    store: &ProfileStore<R>,
    selection: &ActiveSelection,
    ui: &Ui,
) -> Result<()> {
    let current = store.current(selection)?;

    ui.section("Current Profile");
    ui.newline();

    let mut table = ui.simple_table();
    let name_cell = match &current.name {
        ActiveName::Named(name) => ui.header_cell(name),
        ActiveName::ImplicitDefault => ui.cell(current.name.to_string()),
    };
    table.add_row(vec![ui.cell("Profile:"), name_cell]);
    table.add_row(vec![
        ui.cell("Config dir:"),
        ui.cell(current.config_dir.display().to_string()),
    ]);
    table.add_row(vec![
        ui.cell("Credentials:"),
        if current.has_credentials {
            ui.colored_cell("present", AnsiColor::Green)
        } else {
            ui.colored_cell("absent", AnsiColor::Yellow)
        },
    ]);
    ui.println(table.to_string());
    ui.newline();

    match &current.settings {
        Some(settings) => {
            ui.section("settings.json");
            ui.println(settings.trim_end());
        }
        None => ui.warn("No settings.json in the config directory"),
    }
    Ok(())
}

/// Show details about one profile
pub fn inspect<R: ProfileRepository>(
    store: &ProfileStore<R>,
    selection: &ActiveSelection,
    name: Option<&str>,
    ui: &Ui,
) -> Result<()> {
    let name = require(name, "inspect <name>", ui)?;
    let details = match store.inspect(name, selection) {
        Ok(details) => details,
        Err(e) => return Err(not_found_hint(e, ui)),
    };
    let profile = &details.profile;

    ui.section(format!("Profile: {}", profile.name));
    ui.newline();

    let mut table = ui.simple_table();
    table.add_row(vec![ui.cell("Directory:"), ui.cell(profile.dir.display().to_string())]);
    table.add_row(vec![
        ui.cell("Active:"),
        if profile.active {
            ui.colored_cell("yes", AnsiColor::Green)
        } else {
            ui.cell("no")
        },
    ]);
    table.add_row(vec![
        ui.cell("Credentials:"),
        ui.cell(if profile.has_credentials { "present" } else { "absent" }),
    ]);
    table.add_row(vec![
        ui.cell("Settings:"),
        ui.cell(details.settings_path.display().to_string()),
    ]);
    table.add_row(vec![
        ui.cell("Modified:"),
        match details.settings_modified {
            Some(at) => ui.cell(at.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => ui.colored_cell("missing", AnsiColor::Red),
        },
    ]);
    table.add_row(vec![
        ui.cell("Allow rules:"),
        match details.allow_rules {
            Some(n) => ui.cell(n.to_string()),
            None => ui.cell("?"),
        },
    ]);
    ui.println(table.to_string());
    Ok(())
}

/// Select a profile and print the shell assignment that applies it
pub fn use_profile<R: ProfileRepository>(
    store: &ProfileStore<R>,
    selection: &mut ActiveSelection,
    name: Option<&str>,
    shell: ShellKind,
    ui: &Ui,
) -> Result<()> {
    // stdout belongs to the shell's eval
    let ui = ui.on_stderr();
    let name = require(name, "use <name>", &ui)?;

    let spinner = ui.spinner(format!("Switching to profile '{}'...", name));

    match store.use_profile(selection, name) {
        Ok(profile) => {
            ui.spinner_finish_ok(&spinner, format!("Active profile: {}", profile.name));
            ui.emit(shell.export_line(&profile.dir));
            Ok(())
        }
        Err(e) => {
            ui.spinner_finish_err(&spinner, format!("Failed to switch to '{}'", name));
            Err(not_found_hint(e, &ui))
        }
    }
}

/// Create a profile with the default settings document
pub fn create<R: ProfileRepository>(
    store: &mut ProfileStore<R>,
    name: Option<&str>,
    ui: &Ui,
) -> Result<()> {
    let name = require(name, "create <name>", ui)?;

    let profile = match store.create(name) {
        Ok(profile) => profile,
        Err(ProfileError::AlreadyExists(existing)) => {
            ui.println(format!(
                "Hint: Use '{} edit {}' to modify it, or choose a different name.",
                ui.bold("claude-profile"),
                existing
            ));
            return Err(ProfileError::AlreadyExists(existing).into());
        }
        Err(e) => return Err(e.into()),
    };

    ui.ok(format!("Created profile '{}'", profile.name));
    ui.println(format!("  {}", ui.dim(profile.dir.display().to_string())));
    ui.newline();
    ui.println("To activate it:");
    ui.println(format!("  eval \"$(claude-profile use {})\"", profile.name));
    Ok(())
}

/// Open a profile's settings.json in the user's editor
pub fn edit<R: ProfileRepository>(
    store: &ProfileStore<R>,
    name: Option<&str>,
    ui: &Ui,
) -> Result<()> {
    let name = require(name, "edit <name>", ui)?;
    let settings_path = store.edit(name)?;

    open_in_editor(&settings_path)?;
    ui.ok(format!("Opened {} in editor", settings_path.display()));
    Ok(())
}

/// Show a line diff between two profiles' settings
pub fn diff<R: ProfileRepository>(
    store: &ProfileStore<R>,
    first: Option<&str>,
    second: Option<&str>,
    ui: &Ui,
) -> Result<()> {
    let (Some(first), Some(second)) = (first, second) else {
        usage("diff <first> <second>", ui);
        return Err(ProfileError::MissingArgument("two profile names").into());
    };

    let text = store.diff(first, second)?;
    if text.is_empty() {
        ui.ok("Settings are identical");
        return Ok(());
    }

    for line in text.lines() {
        ui.println(colorize_diff_line(ui, line));
    }
    Ok(())
}

fn colorize_diff_line(ui: &Ui, line: &str) -> String {
    if line.starts_with("+++") || line.starts_with("---") {
        ui.bold(line)
    } else if line.starts_with('+') {
        ui.colored(line, AnsiColor::Green)
    } else if line.starts_with('-') {
        ui.colored(line, AnsiColor::Red)
    } else if line.starts_with("@@") {
        ui.colored(line, AnsiColor::Cyan)
    } else {
        line.to_string()
    }
}

/// Run diagnostics
pub fn doctor<R: ProfileRepository>(
    paths: &Paths,
    store: &ProfileStore<R>,
    selection: &ActiveSelection,
    ui: &Ui,
) -> Result<()> {
    run_doctor(paths, store, selection, ui);
    Ok(())
}

/// Unwrap a required name, printing usage when it is absent
fn require<'a>(name: Option<&'a str>, synopsis: &str, ui: &Ui) -> Result<&'a str, ProfileError> {
    match name {
        Some(name) => Ok(name),
        None => {
            usage(synopsis, ui);
            Err(ProfileError::MissingArgument("profile name"))
        }
    }
}

fn usage(synopsis: &str, ui: &Ui) {
    ui.println(format!("Usage: claude-profile {}", synopsis));
}

/// Print the available profiles after a failed lookup, then hand the error back
fn not_found_hint(err: ProfileError, ui: &Ui) -> anyhow::Error {
    if let ProfileError::ProfileNotFound { available, .. } = &err {
        for line in available_listing(available, ui) {
            ui.println(line);
        }
    }
    err.into()
}

/// Lines telling the user which profiles they could have meant, sorted
fn available_listing(available: &[String], ui: &Ui) -> Vec<String> {
    if available.is_empty() {
        return vec!["No profiles exist yet. Create one with 'claude-profile create <name>'.".into()];
    }

    let mut names = available.to_vec();
    names.sort();
    std::iter::once("Available profiles:".to_string())
        .chain(names.iter().map(|name| format!("  {} {}", ui.icon_info(), name)))
        .collect()
}

/// Open a file in the user's editor
///
/// Tries `$VISUAL`, then `$EDITOR`, then `vi`. The variable may carry
/// arguments, e.g. `code -w`.
fn open_in_editor(path: &Path) -> Result<()> {
    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string());

    let mut parts = editor.split_whitespace();
    let program = parts.next().context("Editor command is empty")?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        bail!("Editor exited with non-zero status");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use crate::test_utils::{fs_store, memory_store};
    use crate::ui::ColorMode;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn test_ui() -> Ui {
        Ui::new(ColorMode::Never, false)
    }

    fn profile_error(result: Result<()>) -> ProfileError {
        result
            .unwrap_err()
            .downcast::<ProfileError>()
            .expect("expected a ProfileError")
    }

    #[test]
    fn test_list_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = fs_store(&temp_dir);
        assert!(list(&store, &ActiveSelection::unset(), &test_ui()).is_ok());
    }

    #[test]
    fn test_profile_table_markers() {
        let ui = test_ui();
        let profiles = vec![
            Profile {
                name: "profile_default".into(),
                dir: PathBuf::from("/p/profile_default"),
                has_credentials: false,
                active: false,
            },
            Profile {
                name: "profile_work".into(),
                dir: PathBuf::from("/p/profile_work"),
                has_credentials: true,
                active: true,
            },
        ];
        let rendered = profile_table(&ui, &profiles).to_string();
        let work = rendered.lines().find(|l| l.contains("profile_work")).unwrap();
        assert!(work.contains("[OK]"));
        assert!(work.contains("yes"));
        let default = rendered.lines().find(|l| l.contains("profile_default")).unwrap();
        assert!(!default.contains("[OK]"));
        assert!(!default.contains("yes"));
    }

    #[test]
    fn test_create_and_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = fs_store(&temp_dir);
        let ui = test_ui();

        create(&mut store, Some("work"), &ui).unwrap();
        assert!(store.root().join("profile_work/settings.json").is_file());

        let err = profile_error(create(&mut store, Some("work"), &ui));
        assert!(matches!(err, ProfileError::AlreadyExists(_)));
    }

    #[test]
    fn test_missing_arguments() {
        let mut store = memory_store();
        let ui = test_ui();
        let mut selection = ActiveSelection::unset();

        for result in [
            create(&mut store, None, &ui),
            edit(&store, None, &ui),
            use_profile(&store, &mut selection, None, ShellKind::Posix, &ui),
            diff(&store, Some("a"), None, &ui),
            inspect(&store, &selection, None, &ui),
        ] {
            let err = profile_error(result);
            assert!(matches!(err, ProfileError::MissingArgument(_)));
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn test_use_nonexistent() {
        let mut store = memory_store();
        store.create("work").unwrap();
        let mut selection = ActiveSelection::unset();

        let err = profile_error(use_profile(
            &store,
            &mut selection,
            Some("nonexistent"),
            ShellKind::Posix,
            &test_ui(),
        ));
        assert!(matches!(err, ProfileError::ProfileNotFound { .. }));
        assert!(!selection.is_set());
    }

    #[test]
    fn test_use_path_like_name_is_not_found() {
        let mut store = memory_store();
        store.create("work").unwrap();
        let mut selection = ActiveSelection::new("/elsewhere");

        let err = profile_error(use_profile(
            &store,
            &mut selection,
            Some("../work"),
            ShellKind::Posix,
            &test_ui(),
        ));
        match err {
            ProfileError::ProfileNotFound { available, .. } => {
                assert_eq!(available, vec!["profile_work"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(selection.config_dir(), Some(Path::new("/elsewhere")));
    }

    #[test]
    fn test_available_listing() {
        let ui = test_ui();
        let available = vec!["profile_work".to_string(), "profile_home".to_string()];
        assert_eq!(
            available_listing(&available, &ui),
            vec!["Available profiles:", "  - profile_home", "  - profile_work"]
        );

        let empty = available_listing(&[], &ui);
        assert_eq!(empty.len(), 1);
        assert!(empty[0].contains("claude-profile create"));
    }

    #[test]
    fn test_use_updates_selection() {
        let mut store = memory_store();
        store.create("work").unwrap();
        let mut selection = ActiveSelection::unset();

        use_profile(&store, &mut selection, Some("work"), ShellKind::Posix, &test_ui()).unwrap();
        assert_eq!(
            selection.config_dir(),
            Some(Path::new("/profiles/profile_work"))
        );
    }

    #[test]
    fn test_edit_missing_settings() {
        let mut repo = MemoryRepository::new("/profiles");
        repo.insert_profile("profile_bare", None, false);
        let store = ProfileStore::new(repo, "/home/u/.claude");

        let err = profile_error(edit(&store, Some("bare"), &test_ui()));
        assert!(matches!(err, ProfileError::SettingsNotFound { .. }));
    }

    #[test]
    fn test_diff_commands() {
        let mut store = memory_store();
        store.create("a").unwrap();
        let ui = test_ui();

        assert!(diff(&store, Some("a"), Some("a"), &ui).is_ok());
        let err = profile_error(diff(&store, Some("a"), Some("ghost"), &ui));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_current_no_selection() {
        let store = memory_store();
        assert!(current(&store, &ActiveSelection::unset(), &test_ui()).is_ok());
    }

    #[test]
    fn test_colorize_without_color() {
        let ui = test_ui();
        assert_eq!(colorize_diff_line(&ui, "+added"), "+added");
        assert_eq!(colorize_diff_line(&ui, "@@ -1 +1 @@"), "@@ -1 +1 @@");
    }
}
