//! Command-line surface and verb dispatch.
//!
//! Anything that does not parse as a known verb degrades to printing help;
//! only operations on a named profile can fail.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::commands;
use crate::error::ProfileError;
use crate::paths::{PROFILES_ROOT_ENV, Paths};
use crate::profiles::ProfileStore;
use crate::selection::ActiveSelection;
use crate::shell::ShellKind;
use crate::ui::{ColorMode, Ui};

#[derive(Parser, Debug)]
#[command(name = "claude-profile")]
#[command(about = "Manage isolated Claude Code config profiles selected through CLAUDE_CONFIG_DIR")]
#[command(version)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// When to use colors: always, auto, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the profile_<name> directories
    #[arg(long, global = true, value_name = "DIR", env = PROFILES_ROOT_ENV)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all profiles
    #[command(visible_alias = "ls")]
    List,

    /// Show the active profile, its config directory and settings
    Current,

    /// Show details about one profile
    Inspect {
        /// Profile name, with or without the profile_ prefix
        name: Option<String>,
    },

    /// Select a profile; run as: eval "$(claude-profile use <name>)"
    #[command(visible_alias = "switch")]
    Use {
        /// Profile name, with or without the profile_ prefix
        name: Option<String>,

        /// Syntax of the printed assignment
        #[arg(long, value_enum, default_value_t)]
        shell: ShellKind,
    },

    /// Create a profile with empty permissions
    #[command(visible_alias = "new")]
    Create {
        /// Profile name, with or without the profile_ prefix
        name: Option<String>,
    },

    /// Open a profile's settings.json in $VISUAL or $EDITOR
    Edit {
        /// Profile name, with or without the profile_ prefix
        name: Option<String>,
    },

    /// Show a line diff between two profiles' settings.json
    Diff {
        first: Option<String>,
        second: Option<String>,
    },

    /// Check the profiles root and the active selection for problems
    Doctor,
}

/// Outcome of argument parsing
#[derive(Debug)]
pub enum Invocation {
    /// Global options with the verb taken out of them
    Run { cli: Cli, command: Command },
    /// Text to print before exiting successfully (help or version)
    Usage(String),
}

/// Parse arguments, falling back to help for anything unrecognized
pub fn parse_args<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(mut cli) => match cli.command.take() {
            Some(command) => Invocation::Run { cli, command },
            None => Invocation::Usage(help_text()),
        },
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Invocation::Usage(e.render().to_string())
        }
        Err(_) => Invocation::Usage(help_text()),
    }
}

pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}

/// Run a parsed command against the real filesystem and environment
pub fn dispatch(cli: Cli, command: Command, ui: &Ui) -> Result<()> {
    let paths = Paths::new(cli.root)?;
    let mut store = ProfileStore::open(&paths);
    let mut selection = ActiveSelection::from_env();
    tracing::debug!(
        root = %paths.profiles_root.display(),
        selection = ?selection.config_dir(),
        "dispatching"
    );

    match command {
        Command::List => commands::list(&store, &selection, ui),
        Command::Current => commands::current(&store, &selection, ui),
        Command::Inspect { name } => commands::inspect(&store, &selection, name.as_deref(), ui),
        Command::Use { name, shell } => {
            commands::use_profile(&store, &mut selection, name.as_deref(), shell, ui)
        }
        Command::Create { name } => commands::create(&mut store, name.as_deref(), ui),
        Command::Edit { name } => commands::edit(&store, name.as_deref(), ui),
        Command::Diff { first, second } => {
            commands::diff(&store, first.as_deref(), second.as_deref(), ui)
        }
        Command::Doctor => commands::doctor(&paths, &store, &selection, ui),
    }
}

/// Exit status for a failed command
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ProfileError>()
        .map_or(1, ProfileError::exit_code)
}
