//! Dependency state tracking.
//!
//! A tool whose `pip` entry names a requirements manifest is considered
//! installed once `<tool_dir>/.zenith_deps_installed` exists. Without the
//! marker every manifest package is import-checked in a python subprocess.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use chrono::Local;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Result, ZenithError};
use crate::shell::execute_with_timeout;

use super::spec::{InstallSpec, PipEntry};

/// Name of the sentinel file written into a tool directory.
pub const MARKER_FILE: &str = ".zenith_deps_installed";

/// How long a single import check may take.
pub const IMPORT_TIMEOUT: Duration = Duration::from_secs(5);

static REQUIREMENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(\[[^\]]*\])?\s*((~=|==|!=|<=|>=|<|>|===).*)?$")
        .expect("valid regex")
});

/// Checks whether a python module can be imported.
pub trait ImportProbe {
    fn can_import(&self, module: &str, cwd: &Path) -> bool;
}

/// Runs `python3 -c "import <module>"` with [`IMPORT_TIMEOUT`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonImportProbe;

impl ImportProbe for PythonImportProbe {
    fn can_import(&self, module: &str, cwd: &Path) -> bool {
        let statement = format!("import {}", module);
        match execute_with_timeout("python3", &["-c", &statement], Some(cwd), IMPORT_TIMEOUT) {
            Ok(Some(status)) => status.success(),
            Ok(None) => {
                debug!("Import check for {} timed out", module);
                false
            }
            Err(e) => {
                debug!("Could not run python3 for import check: {}", e);
                false
            }
        }
    }
}

/// Extract the bare package name from one manifest line.
///
/// Returns `Ok(None)` for blanks, comments and pip option lines.
pub fn parse_requirement(line: &str) -> Result<Option<String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return Ok(None);
    }

    let without_marker = line.split(';').next().unwrap_or(line);
    let without_comment = without_marker.split(" #").next().unwrap_or(without_marker);
    let requirement = without_comment.trim();

    let captures =
        REQUIREMENT_NAME
            .captures(requirement)
            .ok_or_else(|| ZenithError::MalformedDependency {
                line: line.to_string(),
            })?;

    Ok(captures.get(1).map(|m| m.as_str().to_string()))
}

/// Python module name for a distribution name.
pub fn module_name(package: &str) -> String {
    package.to_lowercase().replace('-', "_")
}

/// Read the package names declared in a manifest.
pub fn manifest_packages(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let mut packages = Vec::new();
    for line in content.lines() {
        if let Some(name) = parse_requirement(line)? {
            packages.push(name);
        }
    }
    Ok(packages)
}

/// Per-tool marker bookkeeping.
pub struct DependencyTracker<'a> {
    probe: &'a dyn ImportProbe,
}

impl<'a> DependencyTracker<'a> {
    pub fn new(probe: &'a dyn ImportProbe) -> Self {
        Self { probe }
    }

    /// Path of the marker for a tool directory.
    pub fn marker_path(tool_dir: &Path) -> PathBuf {
        tool_dir.join(MARKER_FILE)
    }

    /// Whether the tool's python dependencies are already in place.
    pub fn dependencies_satisfied(&self, spec: Option<&InstallSpec>, tool_dir: &Path) -> bool {
        let manifest = match spec.and_then(InstallSpec::pip_entry) {
            Some(PipEntry::Manifest(manifest)) => manifest,
            _ => return true,
        };

        if Self::marker_path(tool_dir).exists() {
            debug!("Dependency marker present in {}", tool_dir.display());
            return true;
        }

        let manifest_path = tool_dir.join(manifest);
        if !manifest_path.exists() {
            return false;
        }

        let packages = match manifest_packages(&manifest_path) {
            Ok(packages) => packages,
            Err(e) => {
                debug!("Treating dependencies as unsatisfied: {}", e);
                return false;
            }
        };

        packages.iter().all(|package| {
            let module = module_name(package);
            let ok = self.probe.can_import(&module, tool_dir);
            if !ok {
                debug!("Module {} is not importable", module);
            }
            ok
        })
    }

    /// Record that dependencies were installed. Failures are logged only.
    pub fn mark_satisfied(&self, tool_dir: &Path) {
        let content = format!(
            "Dependencies installed by zenith on {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        if let Err(e) = fs::write(Self::marker_path(tool_dir), content) {
            warn!(
                "Could not write dependency marker in {}: {}",
                tool_dir.display(),
                e
            );
        }
    }

    /// Forget a recorded install. Failures are logged only.
    pub fn reset(tool_dir: &Path) {
        let marker = Self::marker_path(tool_dir);
        if !marker.exists() {
            return;
        }
        if let Err(e) = fs::remove_file(&marker) {
            warn!("Could not remove {}: {}", marker.display(), e);
        }
    }
}

/// Tool directories under `install_dir` that carry a marker.
pub fn find_markers(install_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(install_dir) else {
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && DependencyTracker::marker_path(path).exists())
        .collect();
    dirs.sort();
    dirs
}
