//! Error types of the coordinator.

#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use thiserror::Error;

use crate::utils::constants::{FAILURE_EXIT_CODE, MIN_HANDLE_LENGTH};

/// Why a single runtime invocation did not succeed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvocationError {
    #[error("failed to spawn runtime: {0}")]
    Spawn(String),
    #[error("runtime exited with code {code}")]
    NonZeroExit { code: i32 },
    #[error("runtime was terminated by a signal")]
    Terminated,
    #[error("runtime invocation aborted: {0}")]
    Aborted(String),
}

/// Problems found in the forwarded argument vector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UsageError {
    #[error("no IMAGE given")]
    MissingImage,
    #[error("dockrun doesn't support {0}")]
    UnsupportedFlag(String),
}

/// Why `wait` could not deliver an exit code.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaitFailure {
    #[error(transparent)]
    Invocation(#[from] InvocationError),
    #[error("runtime exited with code 0 but reported an error")]
    ErrorInOutput,
}

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("invalid arguments: {}", join_problems(.0))]
    Usage(Vec<UsageError>),
    #[error("run: {output}\nruntime exited with exit code: {exit_code}")]
    Launch { output: String, exit_code: i32 },
    #[error(
        "container ID `{0}` is shorter than {min} characters, possibly invalid",
        min = MIN_HANDLE_LENGTH
    )]
    InvalidHandle(String),
    #[error("wait: {output} {cause}\nwait failed")]
    Wait { output: String, cause: WaitFailure },
    #[error("{output}\nfailed to convert exit code to int")]
    ExitCodeParse { output: String },
}

fn join_problems(problems: &[UsageError]) -> String {
    return problems
        .iter()
        .map(|problem| return problem.to_string())
        .collect::<Vec<String>>()
        .join(", ");
}

impl CoordinatorError {
    pub fn exit_code(&self) -> i32 {
        return FAILURE_EXIT_CODE;
    }
}

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("failed to create log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("logger already initialized: {0}")]
    AlreadySet(#[from] log::SetLoggerError),
}
