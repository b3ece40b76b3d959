//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use zenith::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("install_cupp", "y");
//!
//! ui.message("Starting");
//! ui.success("Done!");
//!
//! assert!(ui.has_message("Starting"));
//! assert!(ui.has_success("Done"));
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::io;

use crate::error::{Result, ZenithError};

use super::{
    is_affirmative, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, Table,
    UserInterface,
};

/// Mock UI implementation for testing.
///
/// Supports single responses (via `set_prompt_response`) and queued
/// responses (via `queue_prompt_responses`) for keys asked repeatedly.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    notes: Vec<String>,
    headers: Vec<String>,
    tables: Vec<Table>,
    spinners: Vec<String>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    interrupt_keys: HashSet<String>,
    prompts_shown: Vec<String>,
    default_prompt_response: Option<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            ..Default::default()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue multiple responses for the same prompt key.
    ///
    /// Responses are returned in order. After the queue is exhausted,
    /// falls back to `set_prompt_response` or defaults.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    /// Set a default response for any prompt key not explicitly configured.
    pub fn set_default_prompt_response(&mut self, response: &str) {
        self.default_prompt_response = Some(response.to_string());
    }

    /// Make the prompt with this key fail as if the user pressed Ctrl-C.
    pub fn interrupt_on(&mut self, key: &str) {
        self.interrupt_keys.insert(key.to_string());
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured notes.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all tables that were shown.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific note was shown.
    pub fn has_note(&self, msg: &str) -> bool {
        self.notes.iter().any(|m| m.contains(msg))
    }

    fn response_for(&mut self, key: &str) -> Option<String> {
        if let Some(queue) = self.prompt_queues.get_mut(key) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }
        self.prompt_responses
            .get(key)
            .cloned()
            .or_else(|| self.default_prompt_response.clone())
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn note(&mut self, msg: &str) {
        self.notes.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        if self.interrupt_keys.contains(&prompt.key) {
            return Err(ZenithError::Io(io::Error::new(
                io::ErrorKind::Interrupted,
                "read interrupted",
            )));
        }

        let response = self
            .response_for(&prompt.key)
            .or_else(|| prompt.default.clone());

        Ok(match (&prompt.prompt_type, response) {
            (PromptType::Confirm, response) => {
                PromptResult::Bool(response.as_deref().is_some_and(is_affirmative))
            }
            (_, response) => PromptResult::String(response.unwrap_or_default()),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner::new())
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_table(&mut self, table: &Table) {
        self.tables.push(table.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that captures finish messages.
#[derive(Debug, Default)]
pub struct MockSpinner {
    messages: Vec<String>,
    finish_message: Option<String>,
    succeeded: Option<bool>,
}

impl MockSpinner {
    /// Create a new mock spinner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all messages set during spinning.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get the final finish message.
    pub fn finish_message(&self) -> Option<&str> {
        self.finish_message.as_deref()
    }

    /// `Some(true)` after success, `Some(false)` after error.
    pub fn succeeded(&self) -> Option<bool> {
        self.succeeded
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish_message = Some(msg.to_string());
        self.succeeded = Some(true);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish_message = Some(msg.to_string());
        self.succeeded = Some(false);
    }
}
