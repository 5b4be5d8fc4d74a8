//! Checks on the arguments forwarded to `run -d`.

#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use crate::error::UsageError;
use crate::utils::constants::UNSUPPORTED_FLAGS;

pub const USAGE: &str = "dockrun [OPTIONS] IMAGE [COMMAND]\n\n\
OPTIONS - same options as docker run, without -a & -i";

/// Returns the flag `arg` spells if it is one we cannot honor.
///
/// `--interactive=true` and `--attach=STDIN` count as well.
fn unsupported_flag(arg: &str) -> Option<&'static str> {
    let name = match arg.split_once('=') {
        Some((name, _)) if name.starts_with("--") => name,
        _ => arg,
    };
    return UNSUPPORTED_FLAGS
        .iter()
        .find(|flag| return **flag == name)
        .copied();
}

/// Validates the argument vector, reporting every problem found.
///
/// All arguments are scanned, including the container command itself.
pub fn validate_args(args: &[String]) -> Result<(), Vec<UsageError>> {
    let mut problems: Vec<UsageError> = Vec::new();
    if args.is_empty() {
        problems.push(UsageError::MissingImage);
    }
    for arg in args {
        if let Some(flag) = unsupported_flag(arg) {
            problems.push(UsageError::UnsupportedFlag(flag.to_string()));
        }
    }
    if problems.is_empty() {
        return Ok(());
    }
    return Err(problems);
}

#[cfg(test)]
#[path = "./tests/test_validation.rs"]
mod test_validation;
