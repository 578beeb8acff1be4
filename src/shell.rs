//! Shell syntax for handing the selection back to the calling shell.
//!
//! A child process cannot change its parent's environment, so `use` prints an
//! assignment on stdout for the shell to `eval`.

use clap::ValueEnum;
use std::path::Path;

use crate::paths::CONFIG_DIR_ENV;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShellKind {
    /// POSIX sh, bash, zsh
    #[default]
    Posix,
    Fish,
}

impl ShellKind {
    /// Statement assigning `CLAUDE_CONFIG_DIR` to `dir`
    pub fn export_line(self, dir: &Path) -> String {
        let value = dir.to_string_lossy();
        match self {
            ShellKind::Posix => format!("export {}={}", CONFIG_DIR_ENV, posix_quote(&value)),
            ShellKind::Fish => format!("set -gx {} {};", CONFIG_DIR_ENV, fish_quote(&value)),
        }
    }
}

fn posix_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn fish_quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', r"\\").replace('\'', r"\'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posix_export() {
        let line = ShellKind::Posix.export_line(Path::new("/home/u/.claude-profiles/profile_work"));
        assert_eq!(
            line,
            "export CLAUDE_CONFIG_DIR='/home/u/.claude-profiles/profile_work'"
        );
    }

    #[test]
    fn test_posix_quote_escapes_single_quote() {
        let line = ShellKind::Posix.export_line(Path::new("/tmp/it's"));
        assert_eq!(line, r"export CLAUDE_CONFIG_DIR='/tmp/it'\''s'");
    }

    #[test]
    fn test_fish_export() {
        let line = ShellKind::Fish.export_line(Path::new("/tmp/it's"));
        assert_eq!(line, r"set -gx CLAUDE_CONFIG_DIR '/tmp/it\'s';");
    }
}
