use crate::context::{AppContext, VerbosityLevel};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Color output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Color when stdout is a terminal and NO_COLOR is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl From<&str> for ColorChoice {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "always" => ColorChoice::Always,
            "never" => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }
}

impl std::fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorChoice::Auto => write!(f, "auto"),
            ColorChoice::Always => write!(f, "always"),
            ColorChoice::Never => write!(f, "never"),
        }
    }
}

/// Check if we should use colors in output
pub fn should_color(ctx: &AppContext) -> bool {
    match ctx.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err()
        }
    }
}

/// Colorize a checkmark for success if colors are enabled
pub fn checkmark(ctx: &AppContext) -> String {
    if should_color(ctx) {
        format!("{}", "✓".green().bold())
    } else {
        "✓".to_string()
    }
}

/// Colorize an X mark for errors if colors are enabled
pub fn error_mark(ctx: &AppContext) -> String {
    if should_color(ctx) {
        format!("{}", "✗".red().bold())
    } else {
        "✗".to_string()
    }
}

/// Print a success message
pub fn success(ctx: &AppContext, message: &str) {
    println!("{} {}", checkmark(ctx), message);
}

/// Print a progress message to stderr when running at least at `level`
pub fn print(ctx: &AppContext, level: VerbosityLevel, message: &str) {
    if ctx.verbosity >= level {
        eprintln!("{}", message);
    }
}

/// Print an error message to stderr
pub fn error(ctx: &AppContext, message: &str) {
    eprintln!("{} {}", error_mark(ctx), message);
}
