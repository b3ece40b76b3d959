//! Install-if-missing and run, shared by the menu and `zenith run`.

use tracing::debug;

use crate::catalogue::Tool;
use crate::error::Result;
use crate::install::{install, InstallOptions, InstallerContext};
use crate::shell::ExitKind;
use crate::ui::{confirm, UserInterface};

/// Make sure `tool` is installed, offering to install it when it is not.
///
/// Returns whether the tool is ready to run.
pub fn ensure_installed(
    tool: &dyn Tool,
    ui: &mut dyn UserInterface,
    options: InstallOptions,
    ctx: &InstallerContext<'_>,
) -> Result<bool> {
    if tool.installed(ctx.locator) {
        return Ok(true);
    }
    let Some(repository) = tool.repository() else {
        return Ok(true);
    };

    ui.warning(&format!("{} is not installed.", tool.name()));
    let accepted = options.unattended
        || confirm(
            ui,
            "confirm_install",
            &format!("Do you want to install {}?", tool.name()),
        )?;
    if !accepted {
        ui.message("Installation cancelled");
        return Ok(false);
    }

    ui.message(&format!("Installing {}...", tool.name()));
    let outcome = install(repository, ui, options, ctx)?;
    if !outcome.is_success() {
        debug!("Install of {} ended with {:?}", tool.name(), outcome);
        return Ok(false);
    }

    if !tool.installed(ctx.locator) {
        ui.error("Installation failed: tool verification check failed");
        return Ok(false);
    }
    Ok(true)
}

/// Run `tool` and report a non-zero exit as a note.
pub fn run_tool(tool: &dyn Tool, ui: &mut dyn UserInterface, args: &[String]) -> Result<i32> {
    ui.message(&format!("Running {}...", tool.name()));
    let code = tool.run(ui, args)?;
    match ExitKind::classify(code) {
        ExitKind::Success => {}
        ExitKind::Failed(code) => ui.note(&format!(
            "Note: {} returned a non-zero exit code ({})",
            tool.name(),
            code
        )),
        kind => ui.note(&format!("Note: {} {} ({})", tool.name(), kind.describe(), code)),
    }
    Ok(code)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fakes shared by command tests.

    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::error::{CloneError, Result};
    use crate::fetch::SourceFetcher;
    use crate::install::{ImportProbe, InstallerContext};
    use crate::platform::{OsTag, StaticLocator};
    use crate::ui::UserInterface;

    pub struct NoProbe;

    impl ImportProbe for NoProbe {
        fn can_import(&self, _module: &str, _cwd: &Path) -> bool {
            false
        }
    }

    /// Creates the destination directory instead of cloning.
    pub struct DirFetcher;

    impl SourceFetcher for DirFetcher {
        fn fetch(
            &self,
            _remote_path: &str,
            dest: &Path,
            _overwrite: bool,
            _ui: &mut dyn UserInterface,
        ) -> std::result::Result<PathBuf, CloneError> {
            fs::create_dir_all(dest)?;
            Ok(dest.to_path_buf())
        }
    }

    pub fn run_ok(_command: &str, _cwd: Option<&Path>) -> Result<i32> {
        Ok(0)
    }

    pub fn linux() -> OsTag {
        OsTag::Linux
    }

    pub fn context<'a>(locator: &'a StaticLocator) -> InstallerContext<'a> {
        InstallerContext {
            run_command: &run_ok,
            detect_os: &linux,
            locator,
            probe: &NoProbe,
            fetcher: &DirFetcher,
        }
    }
}
