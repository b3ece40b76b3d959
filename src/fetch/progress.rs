//! Mapping of `git clone --progress` output to named stages.

use std::fmt;
use std::sync::LazyLock;

use indicatif::ProgressBar;
use regex::Regex;

use crate::shell::{OutputCallback, OutputLine};

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3})%").expect("valid regex"));

/// A phase of a clone, as reported by git on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneStage {
    Counting,
    Compressing,
    Writing,
    Receiving,
    Resolving,
    FindingSources,
    CheckingOut,
}

impl CloneStage {
    /// Recognise the stage a progress line belongs to.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.strip_prefix("remote: ").unwrap_or(line).trim_start();
        let stage = if line.starts_with("Counting objects") || line.starts_with("Enumerating objects")
        {
            CloneStage::Counting
        } else if line.starts_with("Compressing objects") {
            CloneStage::Compressing
        } else if line.starts_with("Writing objects") {
            CloneStage::Writing
        } else if line.starts_with("Receiving objects") {
            CloneStage::Receiving
        } else if line.starts_with("Resolving deltas") {
            CloneStage::Resolving
        } else if line.starts_with("Finding sources") {
            CloneStage::FindingSources
        } else if line.starts_with("Updating files") || line.starts_with("Checking out files") {
            CloneStage::CheckingOut
        } else {
            return None;
        };
        Some(stage)
    }

    /// Label shown next to the spinner.
    pub fn label(self) -> &'static str {
        match self {
            CloneStage::Counting => "Counting",
            CloneStage::Compressing => "Compressing",
            CloneStage::Writing => "Writing",
            CloneStage::Receiving => "Receiving",
            CloneStage::Resolving => "Resolving",
            CloneStage::FindingSources => "Finding sources",
            CloneStage::CheckingOut => "Checking out",
        }
    }
}

impl fmt::Display for CloneStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A parsed progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneProgress {
    pub stage: CloneStage,
    pub percent: Option<u8>,
}

impl CloneProgress {
    /// Parse one stderr line from git.
    pub fn parse(line: &str) -> Option<Self> {
        let stage = CloneStage::from_line(line)?;
        let percent = PERCENT
            .captures(line)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u8>().ok())
            .filter(|p| *p <= 100);
        Some(Self { stage, percent })
    }

    /// Spinner text for this update.
    pub fn message(&self, tool: &str) -> String {
        match self.percent {
            Some(p) => format!("Cloning {}: {} {}%", tool, self.stage, p),
            None => format!("Cloning {}: {}", tool, self.stage),
        }
    }
}

/// Build a streaming callback that mirrors clone progress onto `bar`.
pub fn clone_progress_callback(bar: Option<ProgressBar>, tool: String) -> OutputCallback {
    Box::new(move |line: OutputLine| {
        let OutputLine::Stderr(text) = line else {
            return;
        };
        let Some(progress) = CloneProgress::parse(&text) else {
            return;
        };
        if let Some(bar) = &bar {
            bar.set_message(progress.message(&tool));
        }
    })
}
