//! Utilities shared by the coordinator and the runtime adapter.

#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

pub mod config;
pub mod constants;

/// Strips leading and trailing newlines the runtime appends to its answers.
///
/// Other whitespace is kept, a container id or exit code never contains any.
pub fn trim_newlines(output: &str) -> &str {
    return output.trim_matches(|c| return c == '\n' || c == '\r');
}

/// Renders an argument vector for log and error messages.
pub fn display_args<S: AsRef<str>>(args: &[S]) -> String {
    return args
        .iter()
        .map(|arg| return arg.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");
}

#[cfg(test)]
#[path = "../tests/utils/test_mod.rs"]
mod test_mod;

#[cfg(test)]
#[path = "../tests/utils/test_constants.rs"]
mod test_constants;
