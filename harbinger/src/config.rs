use std::path::{Path, PathBuf};

/// Get the default config file path
///
/// `--config` (or `HARBINGER_CONFIG`) replaces it entirely.
pub fn get_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("harbinger")
        .join("config.yml")
}

/// Pick the config file to load.
///
/// An explicit path is always returned so that a missing file is reported.
/// The default path is only used if something exists there.
pub fn resolve_config_path(explicit: Option<&Path>, default: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if default.exists() => Some(default.to_path_buf()),
        None => None,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
