//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables (`HARBINGER__*`)
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use crate::config;
use crate::format::ColorChoice;
use libharbinger::Config;
use std::path::Path;

/// Verbosity level mapped from the number of `-v` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Trace,
}

impl VerbosityLevel {
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Normal,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::VeryVerbose,
            _ => VerbosityLevel::Trace,
        }
    }

    /// Log filter directive used when `RUST_LOG` is unset
    pub fn filter_directive(&self) -> &'static str {
        match self {
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "info",
            VerbosityLevel::VeryVerbose => "debug",
            VerbosityLevel::Trace => "trace",
        }
    }
}

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
    /// Output coloring
    pub color: ColorChoice,
    /// Verbosity from the command line
    pub verbosity: VerbosityLevel,
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars > CLI flags
    ///
    /// An explicit `config_path` must exist. The default location is only
    /// read when a file is present there.
    pub fn build(
        config_path: Option<&Path>,
        color: ColorChoice,
        verbosity: VerbosityLevel,
    ) -> Result<Self, String> {
        let default_path = config::get_config_path();
        let path = config::resolve_config_path(config_path, &default_path);

        let config = Config::load(path.as_deref()).map_err(|e| match &path {
            Some(p) => format!("Failed to load config from {}: {}", p.display(), e),
            None => format!("Failed to load config: {}", e),
        })?;

        Ok(Self::with_config(config, color, verbosity))
    }

    /// Build a context around an already resolved configuration.
    pub fn with_config(config: Config, color: ColorChoice, verbosity: VerbosityLevel) -> Self {
        Self {
            config,
            color,
            verbosity,
        }
    }

    /// Applies the `--grpc-authority` flag, which beats every other layer.
    pub fn grpc_authority<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.filter(|a| !a.trim().is_empty())
            .unwrap_or(self.config.grpc.authority.as_str())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
