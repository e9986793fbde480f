use super::{Prompter, TextField, WizardError};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use inquire::{validator::Validation, Confirm, CustomUserError, InquireError, Select, Text};

impl From<InquireError> for WizardError {
    fn from(e: InquireError) -> Self {
        match e {
            InquireError::OperationInterrupted | InquireError::OperationCanceled => {
                WizardError::Cancelled
            }
            other => WizardError::Prompt(other.to_string()),
        }
    }
}

/// [`Prompter`] backed by `inquire` on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

fn clear_screen() {
    let mut stdout = std::io::stdout();
    let _ = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0));
}

impl Prompter for TerminalPrompter {
    fn section(&mut self, title: &str) -> Result<(), WizardError> {
        clear_screen();
        println!("\n{title}\n{}\n", "=".repeat(title.len()));
        Ok(())
    }

    fn text(&mut self, field: &TextField<'_>) -> Result<String, WizardError> {
        let validator = field.validator;
        let mut prompt = Text::new(field.message).with_validator(move |input: &str| {
            Ok::<_, CustomUserError>(match validator(input) {
                Ok(()) => Validation::Valid,
                Err(msg) => Validation::Invalid(msg.into()),
            })
        });
        if let Some(default) = field.default.as_deref() {
            prompt = prompt.with_default(default);
        }
        Ok(prompt.prompt()?)
    }

    fn select(&mut self, message: &str, options: &[&str]) -> Result<usize, WizardError> {
        let choice = Select::new(message, options.to_vec()).raw_prompt()?;
        Ok(choice.index)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, WizardError> {
        Ok(Confirm::new(message).with_default(default).prompt()?)
    }
}
