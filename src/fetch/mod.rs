//! Repository fetching.
//!
//! A tool's source is fetched into its local directory before its
//! dependencies are installed. Clone failures are reported as
//! [`CloneError`] and kept apart from install failures.

pub mod git;
pub mod progress;

pub use git::GitFetcher;
pub use progress::{clone_progress_callback, CloneProgress, CloneStage};

use std::path::{Path, PathBuf};

use crate::error::CloneError;
use crate::ui::UserInterface;

/// Something that can put a tool's source at `dest`.
pub trait SourceFetcher {
    /// Clone `remote_path` into `dest`, or update an existing checkout.
    ///
    /// With `overwrite`, an existing checkout is deleted and cloned again.
    fn fetch(
        &self,
        remote_path: &str,
        dest: &Path,
        overwrite: bool,
        ui: &mut dyn UserInterface,
    ) -> Result<PathBuf, CloneError>;
}
