//! Field validators applied at the prompt boundary.
//!
//! Each validator takes the raw answer and returns the message shown to the
//! user when the answer is rejected. The wizard re-asks until one passes.

use crate::model::MIN_API_KEY_LEN;

pub type Validator = fn(&str) -> Result<(), &'static str>;

pub fn non_empty(input: &str) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        return Err("A value is required");
    }
    Ok(())
}

pub fn api_key(input: &str) -> Result<(), &'static str> {
    if input.trim().len() <= MIN_API_KEY_LEN {
        return Err("API key must be longer than 10 characters");
    }
    Ok(())
}

/// Digits only, zero allowed.
pub fn count(input: &str) -> Result<(), &'static str> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err("Enter a whole number");
    }
    input
        .parse::<u32>()
        .map(|_| ())
        .map_err(|_| "Number is too large")
}

pub fn positive(input: &str) -> Result<(), &'static str> {
    count(input)?;
    if input.trim().parse::<u32>() == Ok(0) {
        return Err("Enter a number greater than zero");
    }
    Ok(())
}

/// Unparseable input is rejected the same way as an out-of-range value.
pub fn temperature(input: &str) -> Result<(), &'static str> {
    match input.trim().parse::<f64>() {
        Ok(t) if (0.0..=1.0).contains(&t) => Ok(()),
        _ => Err("Enter a number between 0.0 and 1.0"),
    }
}
