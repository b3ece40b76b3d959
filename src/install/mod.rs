//! Dependency installation for catalogued tools.
//!
//! - [`spec`]: the declarative per-tool install specification
//! - [`resolver`]: picks exactly one command for the detected platform
//! - [`tracker`]: the per-tool marker that makes installs idempotent
//! - [`installer`]: ties fetch, resolve, confirm and run together

pub mod installer;
pub mod outcome;
pub mod resolver;
pub mod spec;
pub mod tracker;

pub use installer::{default_context, install, reset_dependencies, InstallOptions, InstallerContext};
pub use outcome::Outcome;
pub use resolver::{auto_install_package, resolve, InstallPlan, ResolveContext, Strategy};
pub use spec::{InstallSpec, PipEntry, SpecValue};
pub use tracker::{
    find_markers, DependencyTracker, ImportProbe, PythonImportProbe, IMPORT_TIMEOUT, MARKER_FILE,
};
