use dialoguer::{Confirm, Input};
use eyre::{eyre, Context, Result};

pub fn user_select<S: ToString>(prompt: &str, items: &[S], default: usize) -> Result<usize> {
    let selection = dialoguer::Select::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .items(items)
        .interact_opt()
        .wrap_err_with(|| eyre!("User selection cancelled"))?;

    if let Some(index) = selection {
        Ok(index)
    } else {
        Err(eyre!("No selection made - cancelling operation"))
    }
}

pub fn user_input(prompt: String, initial: &str) -> Result<String> {
    Input::new()
        .with_prompt(prompt)
        .default(initial.to_owned())
        .allow_empty(true)
        .interact_text()
        .wrap_err_with(|| eyre!("User input cancelled"))
}

pub fn user_confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .wrap_err_with(|| eyre!("User confirmation cancelled"))
}
