//! Host platform detection.
//!
//! Maps the running OS to a canonical [`OsTag`] and probes for the first
//! available system [`PackageManager`]. Nothing here is cached: callers
//! re-probe on every install so a package manager installed mid-session is
//! picked up.

pub mod locator;
pub mod os;
pub mod package_manager;

pub use locator::{CommandLocator, PathLocator, StaticLocator};
pub use os::{detect_os, OsTag};
pub use package_manager::{detect_package_manager, PackageManager};

/// The detected platform an install is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Canonical OS tag.
    pub os: OsTag,
    /// First system package manager found, if any.
    pub package_manager: Option<PackageManager>,
}

impl Platform {
    /// Create a platform from explicit parts.
    pub fn new(os: OsTag, package_manager: Option<PackageManager>) -> Self {
        Self {
            os,
            package_manager,
        }
    }

    /// Detect the current platform using the given locator.
    pub fn detect(locator: &dyn CommandLocator) -> Self {
        Self::detect_on(detect_os(), locator)
    }

    /// Probe for a package manager on a known OS.
    pub fn detect_on(os: OsTag, locator: &dyn CommandLocator) -> Self {
        let platform = Self {
            os,
            package_manager: detect_package_manager(locator),
        };
        tracing::debug!(
            "Detected platform: os={} package_manager={:?}",
            platform.os,
            platform.package_manager
        );
        platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_on_keeps_given_os() {
        let platform = Platform::detect_on(OsTag::Macos, &StaticLocator::new(["brew"]));
        assert_eq!(platform, Platform::new(OsTag::Macos, Some(PackageManager::Brew)));
    }

    #[test]
    fn detect_uses_locator_for_package_manager() {
        let locator = StaticLocator::new(["pacman"]);
        let platform = Platform::detect(&locator);
        assert_eq!(platform.package_manager, Some(PackageManager::Pacman));
    }

    #[test]
    fn detect_without_managers() {
        let locator = StaticLocator::empty();
        let platform = Platform::detect(&locator);
        assert_eq!(platform.package_manager, None);
        assert_eq!(platform.os, detect_os());
    }

    #[test]
    fn new_stores_parts() {
        let platform = Platform::new(OsTag::Macos, Some(PackageManager::Brew));
        assert_eq!(platform.os, OsTag::Macos);
        assert_eq!(platform.package_manager, Some(PackageManager::Brew));
    }
}
