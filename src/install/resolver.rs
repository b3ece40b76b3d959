//! Install resolution.
//!
//! [`resolve`] walks a fixed priority list of installer kinds and returns
//! the first one that applies to the detected platform. It never runs
//! anything and never tries a second strategy: the caller gets exactly one
//! [`InstallPlan`] or an [`InstallError`].

use std::path::Path;

use regex::Regex;
use std::sync::LazyLock;

use crate::error::InstallError;
use crate::platform::{CommandLocator, OsTag, PackageManager, Platform};
use crate::shell::shell_quote;

use super::spec::{InstallSpec, PipEntry, SpecValue};

/// OS keys that may hold a platform script of their own.
const SCRIPTABLE_OS: [&str; 4] = ["debian", "windows", "macos", "arch"];

static PACKAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._+@-]*$").expect("valid regex"));

/// Which branch of the resolver produced a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// The whole spec is one command.
    Command,
    /// `pip install` of an explicit package list.
    PipPackages,
    /// A verbatim `pip install ...` command.
    PipCommand,
    /// `pip install -r <manifest>`.
    PipRequirements,
    /// `pip install .` because only `pyproject.toml` exists.
    PipProject,
    /// The `go` entry.
    Go,
    /// Binary download with curl or wget.
    Binary,
    /// The detected package manager's own entry.
    PackageManager(PackageManager),
    /// The `brew` entry.
    Brew,
    /// A Linux-family key looked up for the detected manager.
    LinuxFallback(PackageManager),
    /// An OS-specific script.
    OsScript(OsTag),
    /// Built-in package table, used when no install-spec entry matched.
    AutoInstall(PackageManager),
}

impl Strategy {
    /// Whether success should be recorded by the dependency tracker.
    pub fn is_pip(&self) -> bool {
        matches!(
            self,
            Strategy::PipPackages
                | Strategy::PipCommand
                | Strategy::PipRequirements
                | Strategy::PipProject
        )
    }
}

/// A single resolved install command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// Shell command to run.
    pub command: String,
    /// Branch that produced the command.
    pub strategy: Strategy,
    /// Question to ask before running, when the plan needs consent.
    pub confirmation: Option<String>,
}

impl InstallPlan {
    fn new(command: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            command: command.into(),
            strategy,
            confirmation: None,
        }
    }

    fn confirm_with(mut self, question: impl Into<String>) -> Self {
        self.confirmation = Some(question.into());
        self
    }

    /// Whether the plan must be confirmed before running.
    pub fn requires_confirmation(&self) -> bool {
        self.confirmation.is_some()
    }
}

/// What the resolver needs to know about the tool being installed.
pub struct ResolveContext<'a> {
    /// Tool name (used for binary downloads and the auto-install table).
    pub tool_name: &'a str,
    /// The tool's checkout directory.
    pub tool_dir: &'a Path,
    /// Executable lookup for go/brew/curl/wget.
    pub locator: &'a dyn CommandLocator,
}

/// Resolve a spec to exactly one install command.
pub fn resolve(
    spec: &InstallSpec,
    platform: &Platform,
    ctx: &ResolveContext<'_>,
) -> Result<InstallPlan, InstallError> {
    let plan = resolve_inner(spec, platform, ctx)?;
    tracing::debug!(
        "Resolved install for {} via {:?}: {}",
        ctx.tool_name,
        plan.strategy,
        plan.command
    );
    Ok(plan)
}

fn resolve_inner(
    spec: &InstallSpec,
    platform: &Platform,
    ctx: &ResolveContext<'_>,
) -> Result<InstallPlan, InstallError> {
    if let InstallSpec::Command(command) = spec {
        return Ok(InstallPlan::new(command.clone(), Strategy::Command));
    }

    if let Some(entry) = spec.pip_entry() {
        return resolve_pip(entry, ctx.tool_dir);
    }

    if let Some(go) = spec.get("go") {
        if ctx.locator.has_command("go") {
            return Ok(InstallPlan::new(go.as_command(), Strategy::Go));
        }
    }

    if let Some(url) = spec.get("binary") {
        return resolve_binary(&url.as_command(), ctx);
    }

    let detected = platform.package_manager;

    if let Some(pm) = detected {
        if let Some(value) = spec.get(pm.name()) {
            return Ok(InstallPlan::new(
                package_manager_command(pm, value),
                Strategy::PackageManager(pm),
            ));
        }
    }

    if let Some(value) = spec.get("brew") {
        if ctx.locator.has_command("brew") || detected == Some(PackageManager::Brew) {
            let name = value.as_command();
            let command = if name.starts_with("install ") {
                format!("brew {}", name)
            } else {
                format!("brew install {}", name)
            };
            return Ok(InstallPlan::new(command, Strategy::Brew));
        }
    }

    match (&platform.os, detected) {
        (OsTag::Linux, Some(pm)) => {
            let chained = pm
                .linux_fallback_keys()
                .iter()
                .filter_map(|key| spec.get(key))
                .find(|value| !value.is_empty())
                .or_else(|| spec.get("linux"));
            if let Some(value) = chained {
                return Ok(InstallPlan::new(
                    value.as_command(),
                    Strategy::LinuxFallback(pm),
                ));
            }
        }
        (OsTag::Macos | OsTag::Windows, _) => {
            if let Some(value) = spec.get(platform.os.as_str()) {
                return Ok(InstallPlan::new(
                    value.as_command(),
                    Strategy::OsScript(platform.os.clone()),
                ));
            }
        }
        _ => {}
    }

    let os_key = platform.os.as_str();
    if SCRIPTABLE_OS.contains(&os_key) {
        if let Some(value) = spec.get(os_key) {
            return Ok(InstallPlan::new(
                value.as_command(),
                Strategy::OsScript(platform.os.clone()),
            ));
        }
    }

    if let Some(pm) = detected {
        if let Some(package) = auto_install_package(ctx.tool_name, pm) {
            return Ok(InstallPlan::new(
                pm.install_command(package),
                Strategy::AutoInstall(pm),
            )
            .confirm_with(format!("Auto-install {} using {}?", package, pm)));
        }
    }

    Err(InstallError::PlatformUnsupported {
        available_options: spec.keys(),
        os: platform.os.clone(),
        package_manager: detected,
    })
}

fn resolve_pip(entry: PipEntry<'_>, tool_dir: &Path) -> Result<InstallPlan, InstallError> {
    match entry {
        PipEntry::Packages(packages) => Ok(InstallPlan::new(
            format!("pip install {}", packages.join(" ")),
            Strategy::PipPackages,
        )
        .confirm_with("Do you want to install these packages?")),
        PipEntry::Command(command) => Ok(InstallPlan::new(command, Strategy::PipCommand)),
        PipEntry::Manifest(manifest) => {
            let requirements = tool_dir.join(manifest);
            if requirements.exists() {
                return Ok(InstallPlan::new(
                    format!(
                        "pip install -r {}",
                        shell_quote(&requirements.to_string_lossy())
                    ),
                    Strategy::PipRequirements,
                ));
            }
            if tool_dir.join("pyproject.toml").exists() {
                return Ok(InstallPlan::new("pip install .", Strategy::PipProject));
            }
            Err(InstallError::RequirementsNotFound { path: requirements })
        }
    }
}

fn resolve_binary(url: &str, ctx: &ResolveContext<'_>) -> Result<InstallPlan, InstallError> {
    let dir = shell_quote(&ctx.tool_dir.to_string_lossy());
    let target = shell_quote(&ctx.tool_dir.join(ctx.tool_name).to_string_lossy());

    let download = if ctx.locator.has_command("curl") {
        format!("curl -L -o {} -s {}", target, url)
    } else if ctx.locator.has_command("wget") {
        format!("wget -q -O {} {}", target, url)
    } else {
        return Err(InstallError::DownloaderMissing);
    };

    Ok(InstallPlan::new(
        format!("mkdir -p {} && {} && chmod +x {}", dir, download, target),
        Strategy::Binary,
    ))
}

/// Package-manager entries that are plain package names get the manager's
/// install invocation; anything else is taken as a ready command.
fn package_manager_command(pm: PackageManager, value: &SpecValue) -> String {
    let packages: Vec<&str> = match value {
        SpecValue::Single(s) => s.split_whitespace().collect(),
        SpecValue::List(items) => items.iter().map(String::as_str).collect(),
    };

    if !packages.is_empty() && packages.iter().all(|p| PACKAGE_NAME.is_match(p)) {
        pm.install_command(&packages.join(" "))
    } else {
        value.as_command()
    }
}

/// Built-in tool → package table for tools whose spec has no usable entry.
pub fn auto_install_package(tool: &str, pm: PackageManager) -> Option<&'static str> {
    match tool.to_lowercase().as_str() {
        "nmap" => Some("nmap"),
        "bettercap" if pm == PackageManager::Pacman => Some("bettercap"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::StaticLocator;
    use std::fs;
    use tempfile::TempDir;

    fn linux(pm: Option<PackageManager>) -> Platform {
        Platform::new(OsTag::Linux, pm)
    }

    fn resolve_in(
        spec: &InstallSpec,
        platform: &Platform,
        dir: &Path,
        commands: &[&str],
    ) -> Result<InstallPlan, InstallError> {
        let locator = StaticLocator::new(commands.iter().copied());
        let ctx = ResolveContext {
            tool_name: "tool",
            tool_dir: dir,
            locator: &locator,
        };
        resolve(spec, platform, &ctx)
    }

    #[test]
    fn bare_string_is_the_command_on_every_platform() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::command("make && make install");
        let platforms = [
            linux(Some(PackageManager::AptGet)),
            Platform::new(OsTag::Macos, Some(PackageManager::Brew)),
            Platform::new(OsTag::Windows, None),
            Platform::new(OsTag::Other("freebsd".into()), None),
        ];
        for platform in &platforms {
            let plan = resolve_in(&spec, platform, temp.path(), &[]).unwrap();
            assert_eq!(plan.command, "make && make install");
            assert_eq!(plan.strategy, Strategy::Command);
            assert!(!plan.requires_confirmation());
        }
    }

    #[test]
    fn pip_list_joins_each_package_once_and_needs_confirmation() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("pip", vec!["requests", "colorama", "rich"])]);
        let plan = resolve_in(&spec, &linux(None), temp.path(), &[]).unwrap();

        assert_eq!(plan.command, "pip install requests colorama rich");
        for pkg in ["requests", "colorama", "rich"] {
            assert_eq!(plan.command.matches(pkg).count(), 1);
        }
        assert_eq!(plan.strategy, Strategy::PipPackages);
        assert!(plan.requires_confirmation());
    }

    #[test]
    fn pip_direct_command_is_verbatim() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("pip", "pip install .")]);
        let plan = resolve_in(&spec, &linux(None), temp.path(), &[]).unwrap();
        assert_eq!(plan.command, "pip install .");
        assert_eq!(plan.strategy, Strategy::PipCommand);
    }

    #[test]
    fn pip_manifest_resolves_to_requirements_install() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("requirements.txt"),
            "requests>=2.0\n# comment\n\n",
        )
        .unwrap();
        let spec = InstallSpec::options([("pip", "requirements.txt")]);
        let plan = resolve_in(&spec, &linux(None), temp.path(), &[]).unwrap();

        let expected = format!(
            "pip install -r {}",
            temp.path().join("requirements.txt").display()
        );
        assert_eq!(plan.command, expected);
        assert_eq!(plan.strategy, Strategy::PipRequirements);
    }

    #[test]
    fn pip_manifest_falls_back_to_pyproject() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "[project]\n").unwrap();
        let spec = InstallSpec::options([("pip", "requirements.txt")]);
        let plan = resolve_in(&spec, &linux(None), temp.path(), &[]).unwrap();
        assert_eq!(plan.command, "pip install .");
        assert_eq!(plan.strategy, Strategy::PipProject);
    }

    #[test]
    fn missing_manifest_without_pyproject_fails() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([
            ("pip", SpecValue::from("requirements.txt")),
            ("apt-get", SpecValue::from("python3-dev")),
        ]);
        let err = resolve_in(
            &spec,
            &linux(Some(PackageManager::AptGet)),
            temp.path(),
            &["apt-get"],
        )
        .unwrap_err();

        assert_eq!(
            err,
            InstallError::RequirementsNotFound {
                path: temp.path().join("requirements.txt")
            }
        );
        assert!(err.to_string().contains("Requirements file not found"));
    }

    #[test]
    fn go_beats_package_manager_key_when_toolchain_present() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([
            ("apt-get", "bettercap"),
            ("go", "go install github.com/bettercap/bettercap@latest"),
        ]);
        let plan = resolve_in(
            &spec,
            &linux(Some(PackageManager::AptGet)),
            temp.path(),
            &["go", "apt-get"],
        )
        .unwrap();
        assert_eq!(plan.strategy, Strategy::Go);
        assert_eq!(
            plan.command,
            "go install github.com/bettercap/bettercap@latest"
        );
    }

    #[test]
    fn go_skipped_without_toolchain() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("go", "go install x@latest"), ("apt-get", "x")]);
        let plan = resolve_in(
            &spec,
            &linux(Some(PackageManager::AptGet)),
            temp.path(),
            &["apt-get"],
        )
        .unwrap();
        assert_eq!(plan.strategy, Strategy::PackageManager(PackageManager::AptGet));
        assert_eq!(plan.command, "sudo apt-get install -y x");
    }

    #[test]
    fn binary_prefers_curl() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("binary", "https://example.com/tool")]);
        let plan = resolve_in(&spec, &linux(None), temp.path(), &["curl", "wget"]).unwrap();
        let dir = temp.path().display();
        assert_eq!(
            plan.command,
            format!(
                "mkdir -p {dir} && curl -L -o {dir}/tool -s https://example.com/tool && chmod +x {dir}/tool"
            )
        );
        assert_eq!(plan.strategy, Strategy::Binary);
    }

    #[test]
    fn paths_with_spaces_are_quoted() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("my tools");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("requirements.txt"), "requests\n").unwrap();

        let pip = InstallSpec::options([("pip", "requirements.txt")]);
        let plan = resolve_in(&pip, &linux(None), &dir, &[]).unwrap();
        assert_eq!(
            plan.command,
            format!("pip install -r '{}'", dir.join("requirements.txt").display())
        );

        let binary = InstallSpec::options([("binary", "https://example.com/tool")]);
        let plan = resolve_in(&binary, &linux(None), &dir, &["curl"]).unwrap();
        assert!(plan.command.starts_with(&format!("mkdir -p '{}' && ", dir.display())));
        assert!(plan.command.ends_with(&format!("chmod +x '{}'", dir.join("tool").display())));
    }

    #[test]
    fn binary_falls_back_to_wget() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("binary", "https://example.com/tool")]);
        let plan = resolve_in(&spec, &linux(None), temp.path(), &["wget"]).unwrap();
        assert!(plan.command.contains("wget -q -O"));
    }

    #[test]
    fn binary_without_downloader_fails() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("binary", "https://example.com/tool")]);
        let err = resolve_in(&spec, &linux(None), temp.path(), &[]).unwrap_err();
        assert_eq!(err, InstallError::DownloaderMissing);
    }

    #[test]
    fn package_manager_key_with_package_names() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("dnf", "python3-devel openssl-devel libffi-devel")]);
        let plan = resolve_in(
            &spec,
            &linux(Some(PackageManager::Dnf)),
            temp.path(),
            &["dnf"],
        )
        .unwrap();
        assert_eq!(
            plan.command,
            "sudo dnf install -y python3-devel openssl-devel libffi-devel"
        );
    }

    #[test]
    fn package_manager_key_with_raw_command() {
        let temp = TempDir::new().unwrap();
        let raw = "sudo yum install -y golang && go install github.com/bettercap/bettercap@latest";
        let spec = InstallSpec::options([("yum", raw)]);
        let plan = resolve_in(
            &spec,
            &linux(Some(PackageManager::Yum)),
            temp.path(),
            &["yum"],
        )
        .unwrap();
        assert_eq!(plan.command, raw);
        assert_eq!(plan.strategy, Strategy::PackageManager(PackageManager::Yum));
    }

    #[test]
    fn brew_available_gets_install_prefix() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("brew", "wget")]);
        let plan = resolve_in(
            &spec,
            &linux(Some(PackageManager::AptGet)),
            temp.path(),
            &["brew", "apt-get"],
        )
        .unwrap();
        assert_eq!(plan.command, "brew install wget");
        assert_eq!(plan.strategy, Strategy::Brew);
    }

    #[test]
    fn brew_value_with_install_subcommand_is_not_doubled() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("brew", "install --cask wireshark")]);
        let plan = resolve_in(
            &spec,
            &Platform::new(OsTag::Macos, None),
            temp.path(),
            &["brew"],
        )
        .unwrap();
        assert_eq!(plan.command, "brew install --cask wireshark");
    }

    #[test]
    fn brew_only_spec_on_linux_is_unsupported() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("brew", "wget")]);
        let err = resolve_in(
            &spec,
            &linux(Some(PackageManager::AptGet)),
            temp.path(),
            &["apt-get"],
        )
        .unwrap_err();

        match err {
            InstallError::PlatformUnsupported {
                available_options,
                os,
                package_manager,
            } => {
                assert_eq!(available_options, vec!["brew"]);
                assert_eq!(os, OsTag::Linux);
                assert_eq!(package_manager, Some(PackageManager::AptGet));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn linux_fallback_chain_for_apt() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("ubuntu", "./install-ubuntu.sh"), ("debian", "./install-debian.sh")]);
        let plan = resolve_in(
            &spec,
            &linux(Some(PackageManager::AptGet)),
            temp.path(),
            &["apt-get"],
        )
        .unwrap();
        assert_eq!(plan.command, "./install-debian.sh");
        assert_eq!(plan.strategy, Strategy::LinuxFallback(PackageManager::AptGet));
    }

    #[test]
    fn linux_fallback_skips_empty_values() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("linux", ""), ("arch", "./arch.sh")]);
        let plan = resolve_in(
            &spec,
            &linux(Some(PackageManager::Pacman)),
            temp.path(),
            &["pacman"],
        )
        .unwrap();
        assert_eq!(plan.command, "./arch.sh");
    }

    #[test]
    fn zypper_uses_linux_key() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("linux", "./setup.sh")]);
        let plan = resolve_in(
            &spec,
            &linux(Some(PackageManager::Zypper)),
            temp.path(),
            &["zypper"],
        )
        .unwrap();
        assert_eq!(plan.command, "./setup.sh");
    }

    #[test]
    fn macos_key_used_on_macos() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("macos", "./mac.sh"), ("windows", "setup.bat")]);
        let plan = resolve_in(&spec, &Platform::new(OsTag::Macos, None), temp.path(), &[]).unwrap();
        assert_eq!(plan.command, "./mac.sh");
        assert_eq!(plan.strategy, Strategy::OsScript(OsTag::Macos));
    }

    #[test]
    fn windows_key_used_on_windows() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("macos", "./mac.sh"), ("windows", "setup.bat")]);
        let plan =
            resolve_in(&spec, &Platform::new(OsTag::Windows, None), temp.path(), &[]).unwrap();
        assert_eq!(plan.command, "setup.bat");
    }

    #[test]
    fn scriptable_other_os_key() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("debian", "./debian.sh")]);
        let platform = Platform::new(OsTag::Other("debian".into()), None);
        let plan = resolve_in(&spec, &platform, temp.path(), &[]).unwrap();
        assert_eq!(plan.command, "./debian.sh");
    }

    #[test]
    fn non_scriptable_other_os_key_is_ignored() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("freebsd", "./bsd.sh")]);
        let platform = Platform::new(OsTag::Other("freebsd".into()), None);
        let err = resolve_in(&spec, &platform, temp.path(), &[]).unwrap_err();
        assert!(matches!(err, InstallError::PlatformUnsupported { .. }));
    }

    #[test]
    fn auto_install_table_needs_confirmation() {
        let temp = TempDir::new().unwrap();
        let locator = StaticLocator::new(["pacman"]);
        let ctx = ResolveContext {
            tool_name: "bettercap",
            tool_dir: temp.path(),
            locator: &locator,
        };
        let spec = InstallSpec::options([("brew", "bettercap")]);
        let plan = resolve(&spec, &linux(Some(PackageManager::Pacman)), &ctx).unwrap();
        assert_eq!(plan.command, "sudo pacman -S --noconfirm bettercap");
        assert_eq!(plan.strategy, Strategy::AutoInstall(PackageManager::Pacman));
        assert!(plan.requires_confirmation());
    }

    #[test]
    fn auto_install_requires_detected_manager() {
        let temp = TempDir::new().unwrap();
        let locator = StaticLocator::empty();
        let ctx = ResolveContext {
            tool_name: "nmap",
            tool_dir: temp.path(),
            locator: &locator,
        };
        let spec = InstallSpec::options([("brew", "nmap")]);
        let err = resolve(&spec, &linux(None), &ctx).unwrap_err();
        assert!(matches!(err, InstallError::PlatformUnsupported { .. }));
    }

    #[test]
    fn auto_install_table_entries() {
        assert_eq!(auto_install_package("nmap", PackageManager::AptGet), Some("nmap"));
        assert_eq!(auto_install_package("bettercap", PackageManager::AptGet), None);
        assert_eq!(
            auto_install_package("bettercap", PackageManager::Pacman),
            Some("bettercap")
        );
        assert_eq!(auto_install_package("sherlock", PackageManager::Pacman), None);
    }

    #[test]
    fn unsupported_lists_keys_in_order() {
        let temp = TempDir::new().unwrap();
        let spec = InstallSpec::options([("brew", "x"), ("windows", "y"), ("fedora", "z")]);
        let err = resolve_in(&spec, &Platform::new(OsTag::Macos, None), temp.path(), &[])
            .unwrap_err();
        match err {
            InstallError::PlatformUnsupported {
                available_options, ..
            } => assert_eq!(available_options, vec!["brew", "windows", "fedora"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn pip_strategies_are_tracked() {
        assert!(Strategy::PipPackages.is_pip());
        assert!(Strategy::PipRequirements.is_pip());
        assert!(Strategy::PipProject.is_pip());
        assert!(Strategy::PipCommand.is_pip());
        assert!(!Strategy::Go.is_pip());
        assert!(!Strategy::Brew.is_pip());
    }
}
