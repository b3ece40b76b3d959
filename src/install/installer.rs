//! Tool installation.
//!
//! [`install`] drives one tool from "selected in the menu" to an
//! [`Outcome`]: fetch the source, short-circuit when dependencies are
//! already recorded, resolve exactly one command, confirm it if needed,
//! run it, and record success.

use std::path::Path;

use tracing::debug;

use crate::catalogue::ToolDescriptor;
use crate::error::Result;
use crate::fetch::SourceFetcher;
use crate::platform::{detect_os, CommandLocator, OsTag, PathLocator, Platform};
use crate::shell::{run_shell, EXIT_NOT_FOUND};
use crate::ui::{confirm, Table, UserInterface};

use super::outcome::Outcome;
use super::resolver::{resolve, InstallPlan, ResolveContext, Strategy};
use super::spec::{InstallSpec, PipEntry};
use super::tracker::{manifest_packages, DependencyTracker, ImportProbe, PythonImportProbe};

/// Caller-controlled install behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Skip confirmations (treated as "yes").
    pub unattended: bool,
    /// Delete and re-clone an existing checkout.
    pub overwrite: bool,
}

/// Mockable dependencies for the installer.
pub struct InstallerContext<'a> {
    /// Run a shell command in an optional directory, returning its exit code.
    pub run_command: &'a dyn Fn(&str, Option<&Path>) -> Result<i32>,
    /// Report the running OS.
    pub detect_os: &'a dyn Fn() -> OsTag,
    /// Executable lookup for package managers and toolchains.
    pub locator: &'a dyn CommandLocator,
    /// Python import checks for the dependency tracker.
    pub probe: &'a dyn ImportProbe,
    /// Source checkout.
    pub fetcher: &'a dyn SourceFetcher,
}

/// Build the production `InstallerContext` around a fetcher.
pub fn default_context(fetcher: &dyn SourceFetcher) -> InstallerContext<'_> {
    InstallerContext {
        run_command: &|command, cwd| run_shell(command, cwd),
        detect_os: &detect_os,
        locator: &PathLocator,
        probe: &PythonImportProbe,
        fetcher,
    }
}

/// Install one tool.
///
/// Returns `Err` only when a prompt could not be answered (for example
/// Ctrl-C at a confirmation); every install failure is an [`Outcome`].
pub fn install(
    tool: &ToolDescriptor,
    ui: &mut dyn UserInterface,
    options: InstallOptions,
    ctx: &InstallerContext<'_>,
) -> Result<Outcome> {
    if tool.clone {
        if let Err(e) = ctx.fetcher.fetch(
            &tool.remote_path,
            &tool.local_directory,
            options.overwrite,
            ui,
        ) {
            ui.error(&e.to_string());
            return Ok(Outcome::CloneFailed {
                path: tool.local_directory.clone(),
            });
        }
    }

    let Some(spec) = &tool.install else {
        debug!("{} has no install spec", tool.name);
        ui.success(&format!("{} installed", tool.name));
        return Ok(Outcome::Success);
    };

    let tracker = DependencyTracker::new(ctx.probe);
    let tool_dir = tool.local_directory.as_path();

    if matches!(spec.pip_entry(), Some(PipEntry::Manifest(_)))
        && tracker.dependencies_satisfied(Some(spec), tool_dir)
    {
        ui.success(&format!("Dependencies for {} already installed", tool.name));
        return Ok(Outcome::Success);
    }

    let platform = Platform::detect_on((ctx.detect_os)(), ctx.locator);

    let resolve_ctx = ResolveContext {
        tool_name: &tool.name,
        tool_dir,
        locator: ctx.locator,
    };
    let plan = match resolve(spec, &platform, &resolve_ctx) {
        Ok(plan) => plan,
        Err(e) => {
            ui.error(&e.to_string());
            return Ok(e.into());
        }
    };

    if plan.strategy.is_pip() {
        show_dependency_preview(tool, &plan, ui);
    }

    if let Some(question) = &plan.confirmation {
        let accepted = options.unattended
            || confirm(ui, &format!("install_{}", tool.name), question)?;
        if !accepted {
            ui.warning("Installation cancelled");
            return Ok(declined(spec, &platform, &plan));
        }
    }

    // Tools installed without a clone run from the install root.
    let cwd = if tool.clone {
        Some(tool_dir)
    } else {
        tool_dir.parent()
    }
    .filter(|dir| dir.exists());
    ui.message(&format!("Running: {}", plan.command));

    let code = match (ctx.run_command)(&plan.command, cwd) {
        Ok(code) => code,
        Err(e) => {
            ui.error(&e.to_string());
            EXIT_NOT_FOUND
        }
    };

    if code != 0 {
        debug!("Install command for {} exited with {}", tool.name, code);
        if matches!(plan.strategy, Strategy::AutoInstall(_)) {
            let outcome = unsupported(spec, &platform);
            ui.error(&outcome.to_string());
            return Ok(outcome);
        }
        let outcome = Outcome::CommandFailed { exit_code: code };
        ui.error(&outcome.to_string());
        if let Strategy::PackageManager(pm) | Strategy::LinuxFallback(pm) = plan.strategy {
            ui.note(&format!(
                "If the package was not found, refresh the package index with `{}`",
                pm.update_command()
            ));
        }
        return Ok(outcome);
    }

    if plan.strategy.is_pip() {
        tracker.mark_satisfied(tool_dir);
    }
    ui.success(&format!("{} installed", tool.name));
    Ok(Outcome::Success)
}

/// Forget recorded dependencies for a tool.
pub fn reset_dependencies(tool: &ToolDescriptor) {
    DependencyTracker::reset(&tool.local_directory);
}

fn declined(spec: &InstallSpec, platform: &Platform, plan: &InstallPlan) -> Outcome {
    match plan.strategy {
        Strategy::AutoInstall(_) => unsupported(spec, platform),
        _ => Outcome::UserCancelled,
    }
}

fn unsupported(spec: &InstallSpec, platform: &Platform) -> Outcome {
    Outcome::PlatformUnsupported {
        available_options: spec.keys(),
        os: platform.os.clone(),
        package_manager: platform.package_manager,
    }
}

fn show_dependency_preview(tool: &ToolDescriptor, plan: &InstallPlan, ui: &mut dyn UserInterface) {
    let entry = tool.install.as_ref().and_then(InstallSpec::pip_entry);
    let packages: Vec<String> = match (&plan.strategy, entry) {
        (Strategy::PipPackages, Some(PipEntry::Packages(packages))) => packages.to_vec(),
        (Strategy::PipRequirements, Some(PipEntry::Manifest(manifest))) => {
            manifest_packages(&tool.local_directory.join(manifest)).unwrap_or_default()
        }
        _ => return,
    };
    if packages.is_empty() {
        return;
    }

    let mut table = Table::new(vec!["#", "Package"])
        .with_title(&format!("Dependencies for {}", tool.name));
    for (i, package) in packages.iter().enumerate() {
        let index = (i + 1).to_string();
        table.add_row(vec![index.as_str(), package.as_str()]);
    }
    ui.show_table(&table);
}
