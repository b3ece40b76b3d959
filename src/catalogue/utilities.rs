//! Built-in utilities. These run in-process and need no install.

use std::fs;
use std::net::{IpAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::install::{find_markers, DependencyTracker};
use crate::ui::{confirm, Prompt, UserInterface};

use super::{Category, Tool, PROJECT_REPOSITORY};

const CONTRIBUTORS_TIMEOUT: Duration = Duration::from_secs(30);
const BANNER_WIDTH: usize = 30;

/// The utilities, in menu order.
pub fn utilities(install_dir: &Path) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(Host2Ip),
        Box::new(Base64Decode),
        Box::new(Contributors::new(PROJECT_REPOSITORY)),
        Box::new(ResetDependencies::new(install_dir)),
    ]
}

/// First argument, or the trimmed answer to an input prompt.
fn argument_or_prompt(
    ui: &mut dyn UserInterface,
    args: &[String],
    key: &str,
    question: &str,
) -> Result<String> {
    match args.first() {
        Some(arg) => Ok(arg.trim().to_string()),
        None => Ok(ui.prompt(&Prompt::input(key, question))?.as_string().trim().to_string()),
    }
}

/// Resolve a hostname to an IP address.
pub struct Host2Ip;

/// First address for `host`, preferring IPv4.
pub fn resolve_host(host: &str) -> std::io::Result<IpAddr> {
    let addrs: Vec<IpAddr> = (host, 0).to_socket_addrs()?.map(|a| a.ip()).collect();
    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no addresses returned")
        })
}

impl Tool for Host2Ip {
    fn name(&self) -> &str {
        "host2ip"
    }

    fn description(&self) -> &str {
        "Gets IP from host"
    }

    fn category(&self) -> Category {
        Category::Utilities
    }

    fn run(&self, ui: &mut dyn UserInterface, args: &[String]) -> Result<i32> {
        let host = argument_or_prompt(ui, args, "host", "Enter a host")?;
        if host.is_empty() {
            ui.warning("No host entered");
            return Ok(1);
        }

        match resolve_host(&host) {
            Ok(ip) => {
                ui.message(&format!("{} has the IP of {}", host, ip));
                Ok(0)
            }
            Err(e) => {
                ui.error(&format!("Could not resolve {}: {}", host, e));
                Ok(1)
            }
        }
    }
}

/// Decode standard base64 text.
pub struct Base64Decode;

/// Decode `input` (surrounding whitespace ignored). Non-UTF-8 bytes are
/// replaced.
pub fn decode_base64(input: &str) -> std::result::Result<String, base64::DecodeError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(input.trim())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl Tool for Base64Decode {
    fn name(&self) -> &str {
        "base64_decode"
    }

    fn description(&self) -> &str {
        "Decodes base64"
    }

    fn category(&self) -> Category {
        Category::Utilities
    }

    fn run(&self, ui: &mut dyn UserInterface, args: &[String]) -> Result<i32> {
        let input = argument_or_prompt(ui, args, "base64", "Enter base64")?;
        match decode_base64(&input) {
            Ok(text) => {
                ui.message(&format!("Decoded: {}", text));
                Ok(0)
            }
            Err(e) => {
                ui.error(&format!("Invalid base64: {}", e));
                Ok(1)
            }
        }
    }
}

/// One entry of the GitHub contributors API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: u64,
}

/// List the project's contributors, most active first.
pub struct Contributors {
    repository: String,
}

impl Contributors {
    pub fn new(repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
        }
    }

    fn api_url(&self) -> String {
        format!("https://api.github.com/repos/{}/contributors", self.repository)
    }
}

fn fetch_contributors(url: &str) -> anyhow::Result<Vec<Contributor>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("zenith")
        .timeout(CONTRIBUTORS_TIMEOUT)
        .build()?;

    let body = client.get(url).send()?.error_for_status()?.text()?;
    parse_contributors(&body)
}

/// Parse the GitHub contributors listing.
pub fn parse_contributors(body: &str) -> anyhow::Result<Vec<Contributor>> {
    serde_json::from_str(body).context("Failed to parse GitHub API response")
}

/// Sort by contributions, descending. Ties keep API order.
pub fn rank_contributors(mut contributors: Vec<Contributor>) -> Vec<Contributor> {
    contributors.sort_by(|a, b| b.contributions.cmp(&a.contributions));
    contributors
}

/// ` name ` centred in a line of dashes. Extra padding goes on the right.
pub fn banner_line(name: &str, width: usize) -> String {
    let text = format!(" {} ", name);
    let len = text.chars().count();
    if len >= width {
        return text;
    }
    let total = width - len;
    let left = total / 2;
    format!("{}{}{}", "-".repeat(left), text, "-".repeat(total - left))
}

impl Tool for Contributors {
    fn name(&self) -> &str {
        "contributors"
    }

    fn description(&self) -> &str {
        "Prints the contributors"
    }

    fn category(&self) -> Category {
        Category::Utilities
    }

    fn run(&self, ui: &mut dyn UserInterface, _args: &[String]) -> Result<i32> {
        let url = self.api_url();
        debug!("Fetching contributors from {}", url);

        let mut spinner = ui.start_spinner("Fetching contributors");
        let contributors = match fetch_contributors(&url) {
            Ok(list) => {
                spinner.finish_success(&format!("{} contributors", list.len()));
                list
            }
            Err(e) => {
                spinner.finish_error("Could not fetch contributors");
                ui.error(&format!("{:#}", e));
                return Ok(1);
            }
        };

        ui.show_header("Contributors");
        for contributor in rank_contributors(contributors) {
            ui.message(&banner_line(&contributor.login, BANNER_WIDTH));
        }
        Ok(0)
    }
}

/// Delete every dependency marker under the install directory.
pub struct ResetDependencies {
    install_dir: PathBuf,
}

impl ResetDependencies {
    pub fn new(install_dir: &Path) -> Self {
        Self {
            install_dir: install_dir.to_path_buf(),
        }
    }
}

fn tool_dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

impl Tool for ResetDependencies {
    fn name(&self) -> &str {
        "reset_dependencies"
    }

    fn description(&self) -> &str {
        "Reset tool dependency markers"
    }

    fn category(&self) -> Category {
        Category::Utilities
    }

    fn run(&self, ui: &mut dyn UserInterface, _args: &[String]) -> Result<i32> {
        let marked = find_markers(&self.install_dir);
        if marked.is_empty() {
            ui.message("No dependency markers found");
            return Ok(0);
        }

        ui.message(&format!("Found {} dependency markers:", marked.len()));
        for dir in &marked {
            ui.message(&format!("  {}", tool_dir_name(dir)));
        }

        if !confirm(
            ui,
            "reset_dependencies",
            "Do you want to reset all dependency markers?",
        )? {
            return Ok(0);
        }

        let mut failed = false;
        for dir in &marked {
            let marker = DependencyTracker::marker_path(dir);
            match fs::remove_file(&marker) {
                Ok(()) => ui.success(&format!("Reset dependencies for {}", tool_dir_name(dir))),
                Err(e) => {
                    failed = true;
                    ui.error(&format!("Failed to remove {}: {}", marker.display(), e));
                }
            }
        }
        Ok(if failed { 1 } else { 0 })
    }
}
