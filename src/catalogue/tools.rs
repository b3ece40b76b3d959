//! Repository-backed tools.
//!
//! Each tool owns a [`ToolDescriptor`] and a [`Launcher`]. Running a tool
//! builds one or more [`Invocation`]s and hands them to the launcher, which
//! spawns them without a shell.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::install::InstallSpec;
use crate::platform::CommandLocator;
use crate::shell::run_program;
use crate::ui::{confirm, Prompt, UserInterface};

use super::{Category, Tool, ToolDescriptor};

/// File the s3scanner domains are written to, under the install directory.
pub const S3_DOMAINS_FILE: &str = "s3_domains.txt";

/// One program execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Run the program with inherited stdio and return its exit code.
    pub fn spawn(&self) -> Result<i32> {
        run_program(&self.program, &self.args, self.cwd.as_deref())
    }

    /// Command line as shown to the user.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Executes invocations on behalf of a tool.
pub type Launcher = Box<dyn Fn(&Invocation) -> Result<i32>>;

fn spawn_launcher() -> Launcher {
    Box::new(Invocation::spawn)
}

/// Words from `args`, or from a prompt when `args` is empty.
fn words_from(
    ui: &mut dyn UserInterface,
    args: &[String],
    key: &str,
    question: &str,
) -> Result<Vec<String>> {
    if !args.is_empty() {
        return Ok(args.to_vec());
    }
    let answer = ui.prompt(&Prompt::input(key, question))?.as_string();
    Ok(answer.split_whitespace().map(String::from).collect())
}

/// The repository-backed catalogue entries, in menu order.
pub fn repository_tools(install_dir: &Path) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(Sherlock::new(install_dir)),
        Box::new(S3Scanner::new(install_dir)),
        Box::new(Bettercap::new(install_dir)),
        Box::new(Cupp::new(install_dir)),
        Box::new(Cuteit::new(install_dir)),
    ]
}

/// Username search across social networks.
pub struct Sherlock {
    descriptor: ToolDescriptor,
    launcher: Launcher,
}

impl Sherlock {
    pub fn new(install_dir: &Path) -> Self {
        let descriptor = ToolDescriptor::new(
            "sherlock",
            "sherlock-project/sherlock",
            install_dir,
            Category::InformationGathering,
            "Hunt down social media accounts by username across social networks",
        )
        .with_install(InstallSpec::options([("pip", "pip install .")]));
        Self {
            descriptor,
            launcher: spawn_launcher(),
        }
    }

    pub fn with_launcher(mut self, launcher: Launcher) -> Self {
        self.launcher = launcher;
        self
    }

    fn results_dir(&self) -> PathBuf {
        self.descriptor.local_directory.join("results")
    }

    /// Search command for one username. The in-tree script wins over an
    /// installed `sherlock` entry point.
    fn search(&self, username: &str, output: Option<&Path>) -> Invocation {
        let dir = &self.descriptor.local_directory;
        let script = dir.join("sherlock_project").join("sherlock.py");
        let base = if script.exists() {
            Invocation::new("python3").arg(script.to_string_lossy())
        } else {
            Invocation::new("sherlock")
        };

        let mut invocation = base.arg(username);
        if let Some(output) = output {
            invocation = invocation
                .arg("--folderoutput")
                .arg(output.to_string_lossy());
        }
        invocation.arg("--print-found").in_dir(dir)
    }
}

impl Tool for Sherlock {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn description(&self) -> &str {
        &self.descriptor.description
    }

    fn category(&self) -> Category {
        self.descriptor.category
    }

    fn repository(&self) -> Option<&ToolDescriptor> {
        Some(&self.descriptor)
    }

    fn run(&self, ui: &mut dyn UserInterface, args: &[String]) -> Result<i32> {
        let prompted = args.is_empty();
        let usernames = words_from(ui, args, "usernames", "Enter one or more usernames")?;
        if usernames.is_empty() {
            ui.warning("No usernames entered. Aborting.");
            return Ok(1);
        }

        let save = prompted
            && confirm(
                ui,
                "save_results",
                "Do you want to save search results to a file?",
            )?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

        let mut exit_code = 0;
        let mut saved = Vec::new();
        for username in &usernames {
            let output = if save {
                let dir = self.results_dir().join(format!("{}_{}", username, stamp));
                fs::create_dir_all(&dir)?;
                Some(dir)
            } else {
                None
            };

            let invocation = self.search(username, output.as_deref());
            debug!("sherlock: {}", invocation.display());
            let code = (self.launcher)(&invocation)?;
            if code != 0 {
                exit_code = code;
            }
            if let Some(dir) = output {
                saved.push((username.as_str(), dir));
            }
        }

        if !saved.is_empty() {
            ui.success("Results saved to:");
            for (username, dir) in saved {
                let matches = count_text_files(&dir);
                let summary = if matches == 0 {
                    "no matches".to_string()
                } else {
                    format!("{} matches", matches)
                };
                ui.message(&format!("  {}: {} ({})", username, dir.display(), summary));
            }
        }

        Ok(exit_code)
    }
}

fn count_text_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
                .count()
        })
        .unwrap_or(0)
}

/// Open S3 bucket finder.
pub struct S3Scanner {
    descriptor: ToolDescriptor,
    install_dir: PathBuf,
    launcher: Launcher,
}

impl S3Scanner {
    pub fn new(install_dir: &Path) -> Self {
        let descriptor = ToolDescriptor::new(
            "s3scanner",
            "sa7mon/S3Scanner",
            install_dir,
            Category::InformationGathering,
            "A tool to find open S3 buckets and dump their contents",
        )
        .with_install(InstallSpec::options([
            ("pip", "requirements.txt"),
            ("apt-get", "python3-dev"),
            ("yum", "python3-devel"),
            ("dnf", "python3-devel"),
            ("pacman", "python python-pip"),
            ("brew", "python3"),
        ]));
        Self {
            descriptor,
            install_dir: install_dir.to_path_buf(),
            launcher: spawn_launcher(),
        }
    }

    pub fn with_launcher(mut self, launcher: Launcher) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn domains_file(&self) -> PathBuf {
        self.install_dir.join(S3_DOMAINS_FILE)
    }
}

impl Tool for S3Scanner {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn description(&self) -> &str {
        &self.descriptor.description
    }

    fn category(&self) -> Category {
        self.descriptor.category
    }

    fn repository(&self) -> Option<&ToolDescriptor> {
        Some(&self.descriptor)
    }

    fn run(&self, ui: &mut dyn UserInterface, args: &[String]) -> Result<i32> {
        let domains = words_from(ui, args, "domains", "Enter one or more domains")?;
        if domains.is_empty() {
            ui.warning("No domains entered. Aborting.");
            return Ok(1);
        }

        let file = self.domains_file();
        fs::create_dir_all(&self.install_dir)?;
        fs::write(&file, format!("{}\n", domains.join("\n")))?;
        debug!("Wrote {} domains to {}", domains.len(), file.display());

        let invocation = Invocation::new("python3")
            .arg("s3scanner.py")
            .arg(file.to_string_lossy())
            .in_dir(&self.descriptor.local_directory);
        (self.launcher)(&invocation)
    }
}

const BETTERCAP_GO_INSTALL: &str = "go install github.com/bettercap/bettercap@latest";

/// Network attack and monitoring framework. Installed system-wide rather
/// than from a checkout.
pub struct Bettercap {
    descriptor: ToolDescriptor,
    launcher: Launcher,
}

impl Bettercap {
    pub fn new(install_dir: &Path) -> Self {
        let apt = format!(
            "sudo apt install -y golang git build-essential libpcap-dev libusb-1.0-0-dev libnetfilter-queue-dev && {}",
            BETTERCAP_GO_INSTALL
        );
        let yum = format!(
            "sudo yum install -y golang git gcc libpcap-devel libusb-devel && {}",
            BETTERCAP_GO_INSTALL
        );
        let dnf = format!(
            "sudo dnf install -y golang git gcc libpcap-devel libusb-devel && {}",
            BETTERCAP_GO_INSTALL
        );

        let descriptor = ToolDescriptor::new(
            "bettercap",
            "bettercap/bettercap",
            install_dir,
            Category::Networking,
            "Swiss army knife for network attacks and monitoring",
        )
        .with_install(InstallSpec::options([
            ("pacman", "bettercap".to_string()),
            ("brew", "bettercap".to_string()),
            ("apt-get", apt.clone()),
            ("yum", yum),
            ("dnf", dnf),
            ("linux", apt),
            ("arch", "sudo pacman -S --noconfirm bettercap".to_string()),
        ]))
        .without_clone();
        Self {
            descriptor,
            launcher: spawn_launcher(),
        }
    }

    pub fn with_launcher(mut self, launcher: Launcher) -> Self {
        self.launcher = launcher;
        self
    }
}

impl Tool for Bettercap {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn description(&self) -> &str {
        &self.descriptor.description
    }

    fn category(&self) -> Category {
        self.descriptor.category
    }

    fn repository(&self) -> Option<&ToolDescriptor> {
        Some(&self.descriptor)
    }

    fn installed(&self, locator: &dyn CommandLocator) -> bool {
        locator.has_command("bettercap")
    }

    fn run(&self, ui: &mut dyn UserInterface, args: &[String]) -> Result<i32> {
        ui.note("Please note that bettercap must be run with sudo");
        let invocation = Invocation::new("sudo").arg("bettercap").args(args.iter().cloned());
        (self.launcher)(&invocation)
    }
}

/// Common User Passwords Profiler.
pub struct Cupp {
    descriptor: ToolDescriptor,
    launcher: Launcher,
}

impl Cupp {
    pub fn new(install_dir: &Path) -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "cupp",
                "Mebus/cupp",
                install_dir,
                Category::Passwords,
                "Common User Passwords Profiler",
            ),
            launcher: spawn_launcher(),
        }
    }

    pub fn with_launcher(mut self, launcher: Launcher) -> Self {
        self.launcher = launcher;
        self
    }
}

impl Tool for Cupp {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn description(&self) -> &str {
        &self.descriptor.description
    }

    fn category(&self) -> Category {
        self.descriptor.category
    }

    fn repository(&self) -> Option<&ToolDescriptor> {
        Some(&self.descriptor)
    }

    fn run(&self, _ui: &mut dyn UserInterface, args: &[String]) -> Result<i32> {
        let mut invocation = Invocation::new("python3")
            .arg("cupp.py")
            .in_dir(&self.descriptor.local_directory);
        invocation = if args.is_empty() {
            invocation.arg("-i")
        } else {
            invocation.args(args.iter().cloned())
        };
        (self.launcher)(&invocation)
    }
}

/// IP obfuscator.
pub struct Cuteit {
    descriptor: ToolDescriptor,
    launcher: Launcher,
}

impl Cuteit {
    pub fn new(install_dir: &Path) -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                "cuteit",
                "D4Vinci/Cuteit",
                install_dir,
                Category::Obfuscation,
                "IP obfuscator made to make a malicious ip a bit cuter",
            ),
            launcher: spawn_launcher(),
        }
    }

    pub fn with_launcher(mut self, launcher: Launcher) -> Self {
        self.launcher = launcher;
        self
    }
}

impl Tool for Cuteit {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn description(&self) -> &str {
        &self.descriptor.description
    }

    fn category(&self) -> Category {
        self.descriptor.category
    }

    fn repository(&self) -> Option<&ToolDescriptor> {
        Some(&self.descriptor)
    }

    fn run(&self, ui: &mut dyn UserInterface, args: &[String]) -> Result<i32> {
        let ip = match args.first() {
            Some(ip) => ip.clone(),
            None => ui
                .prompt(&Prompt::input("ip", "Enter an IP"))?
                .as_string()
                .trim()
                .to_string(),
        };
        if ip.is_empty() {
            ui.warning("No IP entered. Aborting.");
            return Ok(1);
        }

        let invocation = Invocation::new("python3")
            .arg("Cuteit.py")
            .arg(ip)
            .in_dir(&self.descriptor.local_directory);
        (self.launcher)(&invocation)
    }
}
