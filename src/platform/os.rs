//! Operating system tag.

use std::fmt;

/// Canonical OS tag used as an install spec key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OsTag {
    Linux,
    Macos,
    Windows,
    /// Any other platform, as its raw lowercase name.
    Other(String),
}

impl OsTag {
    /// Map a host OS name (as reported by `std::env::consts::OS`) to a tag.
    pub fn from_os_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "macos" | "darwin" => OsTag::Macos,
            "linux" => OsTag::Linux,
            "windows" => OsTag::Windows,
            other => OsTag::Other(other.to_string()),
        }
    }

    /// The install-spec key for this OS.
    pub fn as_str(&self) -> &str {
        match self {
            OsTag::Linux => "linux",
            OsTag::Macos => "macos",
            OsTag::Windows => "windows",
            OsTag::Other(name) => name,
        }
    }
}

impl fmt::Display for OsTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the running operating system.
pub fn detect_os() -> OsTag {
    OsTag::from_os_name(std::env::consts::OS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_names() {
        assert_eq!(OsTag::from_os_name("linux"), OsTag::Linux);
        assert_eq!(OsTag::from_os_name("macos"), OsTag::Macos);
        assert_eq!(OsTag::from_os_name("Darwin"), OsTag::Macos);
        assert_eq!(OsTag::from_os_name("windows"), OsTag::Windows);
    }

    #[test]
    fn unknown_passes_through_lowercased() {
        assert_eq!(
            OsTag::from_os_name("FreeBSD"),
            OsTag::Other("freebsd".to_string())
        );
        assert_eq!(OsTag::from_os_name("FreeBSD").as_str(), "freebsd");
    }

    #[test]
    fn display_matches_key() {
        assert_eq!(OsTag::Macos.to_string(), "macos");
        assert_eq!(OsTag::Other("haiku".into()).to_string(), "haiku");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn detects_linux_host() {
        assert_eq!(detect_os(), OsTag::Linux);
    }
}
