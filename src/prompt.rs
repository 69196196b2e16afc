use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use crate::error::{Error, Result};

/// Abstraction over the three kinds of question the tool asks.
///
/// The assembler and the rewrite planner only talk to this trait, so tests
/// can script the answers and the real binary can render them with
/// `dialoguer`. Every call blocks until the user has answered.
pub trait Prompter {
    /// Free-text input. An empty answer falls back to `default`.
    fn input(&mut self, prompt: &str, default: &str) -> Result<String>;

    /// Yes/no confirmation.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Pick one of `items`, returning its index.
    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize>;
}

/// Default implementation of [`Prompter`] using `dialoguer` widgets with the
/// `ColorfulTheme`.
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn input(&mut self, prompt: &str, default: &str) -> Result<String> {
        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        let theme = ColorfulTheme::default();
        Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
        let theme = ColorfulTheme::default();
        Select::with_theme(&theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}

/// Asks for text until the trimmed answer is non-empty.
///
/// `required` is printed after every blank answer. The returned value is
/// trimmed.
pub fn ask_required<P: Prompter + ?Sized>(
    prompter: &mut P,
    prompt: &str,
    required: &str,
    default: &str,
) -> Result<String> {
    loop {
        let answer = prompter.input(prompt, default)?;
        let trimmed = answer.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
        eprintln!("{}", console::style(required).yellow());
    }
}
