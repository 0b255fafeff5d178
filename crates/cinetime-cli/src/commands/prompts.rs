use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::{Confirm, Input};

/// Use `value` when given, otherwise ask
pub fn value_or_prompt(value: Option<String>, prompt: &str, default: Option<&str>) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => prompt_string(prompt, default),
    }
}

pub fn prompt_string(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    input.interact_text().map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Masked input; an empty answer is returned as is so validation can report it
pub fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(format!("{}: ", prompt)).map_err(|e| eyre!("Failed to read password: {}", e))
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}
