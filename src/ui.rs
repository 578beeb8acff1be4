//! Terminal output for claude-profile: labels, tables, spinners.
//!
//! Human-readable output normally goes to stdout. Commands whose stdout is
//! meant to be `eval`ed by a shell switch the UI into stderr mode and print
//! the machine-readable line with [`Ui::emit`].
//!
//! # No-color detection (in priority order):
//! 1. `--no-color` CLI flag (highest priority)
//! 2. `NO_COLOR` environment variable (any value)
//! 3. `TERM=dumb` environment variable
//! 4. Non-TTY stdout (detected via anstream)

use anstream::{eprintln, println};
use anstyle::{AnsiColor, Color, Style};
use comfy_table::{Cell, ContentArrangement, Table, presets};
use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::io::IsTerminal;
use std::time::Duration;

/// Color mode for output
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Always emit ANSI colors
    Always,
    /// Emit colors only if TTY and not disabled
    #[default]
    Auto,
    /// Never emit ANSI colors
    Never,
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            _ => Err(format!("invalid color mode: {}", s)),
        }
    }
}

/// UI context holding resolved display settings
#[derive(Debug, Clone)]
pub struct Ui {
    /// Whether colors are enabled
    pub color_enabled: bool,
    /// Whether spinners are enabled (requires TTY + color)
    pub spinner_enabled: bool,
    /// Send human-readable output to stderr instead of stdout
    pub human_on_stderr: bool,
}

impl Ui {
    /// Create a new UI context with color mode detection.
    ///
    /// `force_no_color` (the --no-color flag) wins over everything else.
    pub fn new(mode: ColorMode, force_no_color: bool) -> Self {
        let color_enabled = Self::resolve_color(mode, force_no_color);
        let spinner_enabled = color_enabled && std::io::stdout().is_terminal();

        if !color_enabled {
            anstream::ColorChoice::write_global(anstream::ColorChoice::Never);
        }

        Self {
            color_enabled,
            spinner_enabled,
            human_on_stderr: false,
        }
    }

    /// Same settings, but human-readable output goes to stderr
    pub fn on_stderr(&self) -> Self {
        Self {
            human_on_stderr: true,
            ..self.clone()
        }
    }

    fn line(&self, msg: impl std::fmt::Display) {
        if self.human_on_stderr {
            eprintln!("{msg}");
        } else {
            println!("{msg}");
        }
    }

    /// Print a machine-readable line to stdout regardless of mode
    pub fn emit(&self, line: impl AsRef<str>) {
        println!("{}", line.as_ref());
    }

    fn resolve_color(mode: ColorMode, force_no_color: bool) -> bool {
        if force_no_color || std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if std::env::var("TERM").is_ok_and(|t| t == "dumb") {
            return false;
        }

        match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    // -------------------------------------------------------------------------
    // Styled text
    // -------------------------------------------------------------------------

    fn paint(&self, style: Style, s: &str) -> String {
        if self.color_enabled {
            format!("{style}{s}{style:#}")
        } else {
            s.to_string()
        }
    }

    fn label(&self, name: &str, color: AnsiColor, msg: &str) -> String {
        let style = Style::new().fg_color(Some(Color::Ansi(color))).bold();
        format!("{} {msg}", self.paint(style, name))
    }

    pub fn ok(&self, msg: impl AsRef<str>) {
        self.line(self.label("OK", AnsiColor::Green, msg.as_ref()));
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.line(self.label("WARN", AnsiColor::Yellow, msg.as_ref()));
    }

    /// Errors always go to stderr
    pub fn err(&self, msg: impl AsRef<str>) {
        eprintln!("{}", self.label("ERROR", AnsiColor::Red, msg.as_ref()));
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.line(self.label("INFO", AnsiColor::Cyan, msg.as_ref()));
    }

    pub fn dim(&self, s: impl AsRef<str>) -> String {
        let style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack)));
        self.paint(style, s.as_ref())
    }

    pub fn bold(&self, s: impl AsRef<str>) -> String {
        self.paint(Style::new().bold(), s.as_ref())
    }

    pub fn colored(&self, s: impl AsRef<str>, color: AnsiColor) -> String {
        self.paint(Style::new().fg_color(Some(Color::Ansi(color))), s.as_ref())
    }

    // -------------------------------------------------------------------------
    // Status icons (with fallback for no-color)
    // -------------------------------------------------------------------------

    pub fn icon_ok(&self) -> &'static str {
        if self.color_enabled { "✓" } else { "[OK]" }
    }

    pub fn icon_warn(&self) -> &'static str {
        if self.color_enabled { "⚠" } else { "[!]" }
    }

    pub fn icon_err(&self) -> &'static str {
        if self.color_enabled { "✗" } else { "[X]" }
    }

    pub fn icon_info(&self) -> &'static str {
        if self.color_enabled { "•" } else { "-" }
    }

    // -------------------------------------------------------------------------
    // Tables (comfy-table)
    // -------------------------------------------------------------------------

    /// Create a simple table without borders (for lists)
    pub fn simple_table(&self) -> Table {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.load_preset(presets::NOTHING);
        table
    }

    /// Create a styled cell
    pub fn cell(&self, content: impl Into<String>) -> Cell {
        Cell::new(content.into())
    }

    /// Create a styled header cell (bold when color enabled)
    pub fn header_cell(&self, content: impl Into<String>) -> Cell {
        let cell = Cell::new(content.into());
        if self.color_enabled {
            cell.add_attribute(comfy_table::Attribute::Bold)
        } else {
            cell
        }
    }

    /// Create a colored cell using comfy-table's native styling
    /// This avoids ANSI width calculation issues
    pub fn colored_cell(&self, content: impl Into<String>, color: AnsiColor) -> Cell {
        let cell = Cell::new(content.into());
        if self.color_enabled {
            cell.fg(ansi_to_comfy_color(color))
        } else {
            cell
        }
    }

    // -------------------------------------------------------------------------
    // Spinners (indicatif)
    // -------------------------------------------------------------------------

    /// Spinner shown on stderr while a command works; hidden when disabled
    pub fn spinner(&self, message: impl Into<Cow<'static, str>>) -> ProgressBar {
        let pb = if self.spinner_enabled {
            let pb = ProgressBar::new_spinner();
            pb.set_style(spinner_style("{spinner:.cyan} {msg}").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message);
        pb
    }

    pub fn spinner_finish_ok(&self, pb: &ProgressBar, msg: impl Into<Cow<'static, str>>) {
        if self.spinner_enabled {
            self.finish_with_icon(pb, "✓", AnsiColor::Green, msg.into());
        } else {
            pb.finish_and_clear();
            self.ok(msg.into());
        }
    }

    pub fn spinner_finish_err(&self, pb: &ProgressBar, msg: impl Into<Cow<'static, str>>) {
        if self.spinner_enabled {
            self.finish_with_icon(pb, "✗", AnsiColor::Red, msg.into());
        } else {
            pb.finish_and_clear();
            self.err(msg.into());
        }
    }

    fn finish_with_icon(&self, pb: &ProgressBar, icon: &str, color: AnsiColor, msg: Cow<'static, str>) {
        pb.set_style(spinner_style("{msg}"));
        pb.finish_with_message(format!("{} {msg}", self.colored(icon, color)));
    }

    // -------------------------------------------------------------------------
    // Println helpers (using anstream for proper tty handling)
    // -------------------------------------------------------------------------

    /// Print a line of human-readable output
    pub fn println(&self, msg: impl AsRef<str>) {
        self.line(msg.as_ref());
    }

    /// Print an empty line
    pub fn newline(&self) {
        self.line("");
    }

    /// Print a section header
    pub fn section(&self, title: impl AsRef<str>) {
        self.line(self.bold(title));
    }
}

fn spinner_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn ansi_to_comfy_color(color: AnsiColor) -> comfy_table::Color {
    match color {
        AnsiColor::Black => comfy_table::Color::Black,
        AnsiColor::Red => comfy_table::Color::Red,
        AnsiColor::Green => comfy_table::Color::Green,
        AnsiColor::Yellow => comfy_table::Color::Yellow,
        AnsiColor::Blue => comfy_table::Color::Blue,
        AnsiColor::Magenta => comfy_table::Color::Magenta,
        AnsiColor::Cyan => comfy_table::Color::Cyan,
        AnsiColor::White => comfy_table::Color::White,
        AnsiColor::BrightBlack => comfy_table::Color::DarkGrey,
        AnsiColor::BrightRed => comfy_table::Color::Red,
        AnsiColor::BrightGreen => comfy_table::Color::Green,
        AnsiColor::BrightYellow => comfy_table::Color::Yellow,
        AnsiColor::BrightBlue => comfy_table::Color::Blue,
        AnsiColor::BrightMagenta => comfy_table::Color::Magenta,
        AnsiColor::BrightCyan => comfy_table::Color::Cyan,
        AnsiColor::BrightWhite => comfy_table::Color::White,
    }
}
