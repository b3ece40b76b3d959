//! Interactive prompts.

use console::Term;
use dialoguer::{Input, Select};

use crate::error::{Result, ZenithError};

use super::{Prompt, PromptOption, PromptResult, PromptType, UserInterface};

/// Convert dialoguer errors to ZenithError.
fn map_dialoguer_err(e: dialoguer::Error) -> ZenithError {
    ZenithError::Io(e.into())
}

/// Whether a typed answer means "yes": anything starting with `y`, in any
/// case. Empty input is "no".
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .trim()
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}

/// Prompt the user for input.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    match &prompt.prompt_type {
        PromptType::Confirm => prompt_confirm(prompt, term),
        PromptType::Input => prompt_input(prompt, term),
        PromptType::Select { options } => prompt_select(prompt, options, term),
    }
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let answer: String = Input::<String>::new()
        .with_prompt(format!("{} [y/N]", prompt.question))
        .allow_empty(true)
        .interact_text_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(is_affirmative(&answer)))
}

fn prompt_input(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let input = Input::<String>::new()
        .with_prompt(&prompt.question)
        .allow_empty(true);

    let result: String = if let Some(default) = &prompt.default {
        input
            .default(default.clone())
            .interact_text_on(term)
            .map_err(map_dialoguer_err)?
    } else {
        input.interact_text_on(term).map_err(map_dialoguer_err)?
    };

    Ok(PromptResult::String(result))
}

fn prompt_select(prompt: &Prompt, options: &[PromptOption], term: &Term) -> Result<PromptResult> {
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let default_idx = prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(default_idx)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    let chosen = options.get(selection).ok_or_else(|| ZenithError::ConfigValidationError {
        message: format!("selection {} out of range", selection),
    })?;
    Ok(PromptResult::String(chosen.value.clone()))
}

/// Ask a yes/no question through any UI.
pub fn confirm(ui: &mut dyn UserInterface, key: &str, question: &str) -> Result<bool> {
    let result = ui.prompt(&Prompt::confirm(key, question))?;
    Ok(match result {
        PromptResult::Bool(b) => b,
        PromptResult::String(s) => is_affirmative(&s),
    })
}

/// Wait for the user to press enter. No-op when not interactive.
pub fn pause(ui: &mut dyn UserInterface) -> Result<()> {
    if ui.is_interactive() {
        ui.prompt(&Prompt::input("continue", "Press enter to continue"))?;
    }
    Ok(())
}
