//! Non-interactive UI for piped or scripted runs.

use std::collections::HashMap;

use crate::error::{Result, ZenithError};

use super::{
    is_affirmative, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, Table,
    UserInterface,
};

const PROMPT_ENV_PREFIX: &str = "ZENITH_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `ZENITH_PROMPT_<KEY>` environment variables,
/// then from the prompt default. Confirmations without either are declined.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn answer_for(&self, prompt: &Prompt) -> Option<String> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        self.env_overrides
            .get(&env_key)
            .cloned()
            .or_else(|| prompt.default.clone())
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("[+] {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("[!] {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("[-] {}", msg);
    }

    fn note(&mut self, msg: &str) {
        if self.mode.shows_notes() {
            println!("[*] {}", msg);
        }
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let answer = self.answer_for(prompt);

        match (&prompt.prompt_type, answer) {
            (PromptType::Confirm, answer) => Ok(PromptResult::Bool(
                answer.as_deref().is_some_and(is_affirmative),
            )),
            (_, Some(value)) => Ok(PromptResult::String(value)),
            (_, None) => Err(ZenithError::ConfigValidationError {
                message: format!(
                    "Cannot prompt for '{}' in non-interactive mode (no default value)",
                    prompt.key
                ),
            }),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_table(&mut self, table: &Table) {
        if self.mode.shows_status() {
            println!("{}", table.render());
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// A spinner that prints its final status only.
struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        println!("[+] {}", msg);
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("[-] {}", msg);
    }
}
