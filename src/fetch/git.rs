//! Git checkout fetching.
//!
//! Clones tool repositories from GitHub with the git CLI, or pulls them
//! when a checkout already exists.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CloneError;
use crate::shell::{execute, execute_streaming, shell_quote, CommandOptions};
use crate::ui::UserInterface;

use super::progress::clone_progress_callback;
use super::SourceFetcher;

/// Fetches tool sources with the git CLI.
#[derive(Debug, Clone, Default)]
pub struct GitFetcher {
    ssh_clone: bool,
    base_url: Option<String>,
}

impl GitFetcher {
    /// Create a fetcher. `ssh_clone` selects `git@github.com:` URLs.
    pub fn new(ssh_clone: bool) -> Self {
        Self {
            ssh_clone,
            base_url: None,
        }
    }

    /// Resolve `owner/repo` paths against another base (a mirror or a local
    /// directory) instead of GitHub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Clone URL for an `owner/repo` path.
    pub fn remote_url(&self, remote_path: &str) -> String {
        if let Some(base) = &self.base_url {
            return format!("{}/{}", base.trim_end_matches('/'), remote_path);
        }
        if self.ssh_clone {
            format!("git@github.com:{}.git", remote_path)
        } else {
            format!("https://github.com/{}", remote_path)
        }
    }

    fn pull(&self, dest: &Path, name: &str, ui: &mut dyn UserInterface) -> Result<(), CloneError> {
        let mut spinner = ui.start_spinner(&format!("Updating {}", name));
        debug!("git pull in {}", dest.display());

        let options = CommandOptions {
            cwd: Some(dest.to_path_buf()),
            capture_stdout: true,
            capture_stderr: true,
        };
        let result = execute("git pull", &options).map_err(|e| git_error("pull", e))?;

        if !result.success {
            spinner.finish_error(&format!("Failed to update {}", name));
            return Err(CloneError::Git {
                operation: "pull".to_string(),
                message: result.stderr.trim().to_string(),
            });
        }

        spinner.finish_success(&format!("{} is up to date", name));
        Ok(())
    }

    fn clone_into(
        &self,
        remote_path: &str,
        dest: &Path,
        name: &str,
        ui: &mut dyn UserInterface,
    ) -> Result<(), CloneError> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let url = self.remote_url(remote_path);
        let command = format!(
            "git clone --progress {} {}",
            shell_quote(&url),
            shell_quote(&dest.to_string_lossy())
        );
        debug!("Running: {}", command);

        let mut spinner = ui.start_spinner(&format!("Cloning {}", name));
        let callback = clone_progress_callback(spinner.progress_bar(), name.to_string());
        let result = execute_streaming(&command, &CommandOptions::default(), callback)
            .map_err(|e| git_error("clone", e))?;

        if !result.success {
            spinner.finish_error(&format!("Failed to clone {}", name));
            return Err(CloneError::Git {
                operation: "clone".to_string(),
                message: last_line(&result.stderr),
            });
        }

        spinner.finish_success(&format!("Cloned {}", name));
        Ok(())
    }
}

impl SourceFetcher for GitFetcher {
    fn fetch(
        &self,
        remote_path: &str,
        dest: &Path,
        overwrite: bool,
        ui: &mut dyn UserInterface,
    ) -> Result<PathBuf, CloneError> {
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| remote_path.to_string());

        if dest.exists() && !overwrite {
            self.pull(dest, &name, ui)?;
        } else {
            if dest.exists() {
                debug!("Removing {} before re-clone", dest.display());
                fs::remove_dir_all(dest)?;
            }
            self.clone_into(remote_path, dest, &name, ui)?;
        }

        if !dest.exists() {
            return Err(CloneError::Missing {
                path: dest.to_path_buf(),
            });
        }

        Ok(dest.to_path_buf())
    }
}

fn git_error(operation: &str, err: crate::error::ZenithError) -> CloneError {
    CloneError::Git {
        operation: operation.to_string(),
        message: err.to_string(),
    }
}

fn last_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("git exited with an error")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::process::Command;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static GIT_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn https_url_by_default() {
        let fetcher = GitFetcher::new(false);
        assert_eq!(
            fetcher.remote_url("sherlock-project/sherlock"),
            "https://github.com/sherlock-project/sherlock"
        );
    }

    #[test]
    fn ssh_url_when_enabled() {
        let fetcher = GitFetcher::new(true);
        assert_eq!(
            fetcher.remote_url("Mebus/cupp"),
            "git@github.com:Mebus/cupp.git"
        );
    }

    #[test]
    fn base_url_override() {
        let fetcher = GitFetcher::new(true).with_base_url("file:///srv/mirror/");
        assert_eq!(fetcher.remote_url("Mebus/cupp"), "file:///srv/mirror/Mebus/cupp");
    }

    #[test]
    fn last_line_skips_blanks() {
        assert_eq!(last_line("one\nfatal: nope\n\n"), "fatal: nope");
        assert_eq!(last_line(""), "git exited with an error");
    }

    fn git(args: &[&str], cwd: &Path) {
        let output = Command::new("git").args(args).current_dir(cwd).output().unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Create `<root>/owner/tool.git` with one commit holding `README`.
    fn create_bare_repo(root: &Path) -> PathBuf {
        let bare = root.join("owner").join("tool.git");
        fs::create_dir_all(&bare).unwrap();
        git(&["init", "--bare", "--initial-branch=main", "."], &bare);

        let work = root.join("work");
        git(
            &["clone", &bare.to_string_lossy(), &work.to_string_lossy()],
            root,
        );
        git(&["config", "user.name", "Test"], &work);
        git(&["config", "user.email", "test@test.com"], &work);
        fs::write(work.join("README"), "tool\n").unwrap();
        git(&["add", "."], &work);
        git(&["commit", "-m", "Initial commit"], &work);
        git(&["push", "origin", "HEAD:main"], &work);
        bare
    }

    #[test]
    fn clones_then_pulls() {
        let _lock = GIT_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        create_bare_repo(temp.path());
        let fetcher = GitFetcher::new(false).with_base_url(temp.path().to_string_lossy());
        let dest = temp.path().join("tools").join("tool");
        let mut ui = MockUI::new();

        let path = fetcher.fetch("owner/tool.git", &dest, false, &mut ui).unwrap();
        assert_eq!(path, dest);
        assert!(dest.join("README").exists());
        assert_eq!(ui.spinners(), ["Cloning tool"]);

        fetcher.fetch("owner/tool.git", &dest, false, &mut ui).unwrap();
        assert_eq!(ui.spinners(), ["Cloning tool", "Updating tool"]);
    }

    #[test]
    fn overwrite_replaces_checkout() {
        let _lock = GIT_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        create_bare_repo(temp.path());
        let fetcher = GitFetcher::new(false).with_base_url(temp.path().to_string_lossy());
        let dest = temp.path().join("tools").join("tool");
        let mut ui = MockUI::new();

        fetcher.fetch("owner/tool.git", &dest, false, &mut ui).unwrap();
        fs::write(dest.join("stray.txt"), "local").unwrap();

        fetcher.fetch("owner/tool.git", &dest, true, &mut ui).unwrap();
        assert!(!dest.join("stray.txt").exists());
        assert!(dest.join("README").exists());
    }

    #[test]
    fn missing_remote_is_a_git_error() {
        let _lock = GIT_LOCK.lock().unwrap();
        let temp = TempDir::new().unwrap();
        let fetcher = GitFetcher::new(false).with_base_url(temp.path().to_string_lossy());
        let dest = temp.path().join("tools").join("ghost");
        let mut ui = MockUI::new();

        let err = fetcher
            .fetch("owner/ghost.git", &dest, false, &mut ui)
            .unwrap_err();
        assert!(matches!(err, CloneError::Git { ref operation, .. } if operation == "clone"));
        assert!(!dest.exists());
    }
}
