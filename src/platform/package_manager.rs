//! System package manager detection.

use std::fmt;

use super::locator::CommandLocator;

/// A system package manager Zenith knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Brew,
    AptGet,
    Yum,
    Pacman,
    Dnf,
    Zypper,
}

impl PackageManager {
    /// Probe order: the first one found wins.
    pub const PREFERENCE: [PackageManager; 6] = [
        PackageManager::Brew,
        PackageManager::AptGet,
        PackageManager::Yum,
        PackageManager::Pacman,
        PackageManager::Dnf,
        PackageManager::Zypper,
    ];

    /// Executable name, also the install spec key.
    pub fn name(self) -> &'static str {
        match self {
            PackageManager::Brew => "brew",
            PackageManager::AptGet => "apt-get",
            PackageManager::Yum => "yum",
            PackageManager::Pacman => "pacman",
            PackageManager::Dnf => "dnf",
            PackageManager::Zypper => "zypper",
        }
    }

    /// Command that installs `package` non-interactively.
    pub fn install_command(self, package: &str) -> String {
        match self {
            PackageManager::Brew => format!("brew install {}", package),
            PackageManager::AptGet => format!("sudo apt-get install -y {}", package),
            PackageManager::Yum => format!("sudo yum install -y {}", package),
            PackageManager::Pacman => format!("sudo pacman -S --noconfirm {}", package),
            PackageManager::Dnf => format!("sudo dnf install -y {}", package),
            PackageManager::Zypper => format!("sudo zypper install -y {}", package),
        }
    }

    /// Command that refreshes the package index.
    pub fn update_command(self) -> &'static str {
        match self {
            PackageManager::Brew => "brew update",
            PackageManager::AptGet => "sudo apt-get update",
            PackageManager::Yum => "sudo yum check-update",
            PackageManager::Pacman => "sudo pacman -Sy",
            PackageManager::Dnf => "sudo dnf check-update",
            PackageManager::Zypper => "sudo zypper refresh",
        }
    }

    /// Spec keys consulted, in order, when running on Linux with this manager.
    pub fn linux_fallback_keys(self) -> &'static [&'static str] {
        match self {
            PackageManager::AptGet => &["linux", "debian", "ubuntu"],
            PackageManager::Yum => &["linux", "rhel", "centos"],
            PackageManager::Pacman => &["linux", "arch"],
            PackageManager::Dnf => &["linux", "fedora"],
            PackageManager::Zypper => &["linux", "opensuse"],
            PackageManager::Brew => &[],
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Find the first available package manager in preference order.
pub fn detect_package_manager(locator: &dyn CommandLocator) -> Option<PackageManager> {
    PackageManager::PREFERENCE
        .into_iter()
        .find(|pm| locator.has_command(pm.name()))
}
