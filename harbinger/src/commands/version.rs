use std::fmt;

/// Versions reported by `harbinger version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionInfo {
    pub cli: &'static str,
    pub library: &'static str,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            cli: env!("CARGO_PKG_VERSION"),
            library: libharbinger::version(),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "harbinger {}", self.cli)?;
        write!(f, "libharbinger {}", self.library)
    }
}

pub fn print_version() {
    println!("{}", VersionInfo::current());
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
