//! Boundary to the external container runtime CLI.

#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use std::fmt;

#[cfg(test)]
use mockall::automock;

use crate::error::InvocationError;
use crate::utils::constants::UNKNOWN_EXIT_CODE;

mod docker;
pub use docker::DockerCli;

/// Control verbs the signal relay can send to a running container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlVerb {
    /// Graceful shutdown, the runtime escalates to a kill after its own grace period.
    Stop,
    Kill,
}

impl ControlVerb {
    pub fn as_str(&self) -> &'static str {
        return match self {
            ControlVerb::Stop => "stop",
            ControlVerb::Kill => "kill",
        };
    }
}

impl fmt::Display for ControlVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(self.as_str());
    }
}

/// How much an outcome can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    /// The invocation itself failed (spawn error, non-zero exit, signal).
    Failed,
    /// Exit status 0, but the output carries the error marker.
    ErrorInOutput,
}

/// Combined output and exit status of one runtime invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    /// Combined stdout and stderr exactly as the runtime wrote them.
    pub bytes: Vec<u8>,
    /// Lossy UTF-8 view of `bytes` for marker checks, parsing and diagnostics.
    pub output: String,
    pub exit_code: i32,
    pub error: Option<InvocationError>,
}

impl CommandOutcome {
    pub fn from_bytes(bytes: Vec<u8>, exit_code: i32, error: Option<InvocationError>) -> Self {
        let output = String::from_utf8_lossy(&bytes).into_owned();
        return CommandOutcome {
            bytes,
            output,
            exit_code,
            error,
        };
    }

    pub fn success(output: &str) -> Self {
        return CommandOutcome::from_bytes(output.as_bytes().to_vec(), 0, None);
    }

    pub fn failure(output: &str, exit_code: i32, error: InvocationError) -> Self {
        return CommandOutcome::from_bytes(output.as_bytes().to_vec(), exit_code, Some(error));
    }

    /// Outcome for an invocation whose worker went away without reporting back.
    pub fn aborted(reason: &str) -> Self {
        return CommandOutcome::failure(
            "",
            UNKNOWN_EXIT_CODE,
            InvocationError::Aborted(reason.to_string()),
        );
    }

    pub fn is_error(&self) -> bool {
        return self.error.is_some();
    }

    /// Classifies the outcome, exit status first and `marker` in the output second.
    pub fn verdict(&self, marker: &str) -> Verdict {
        if self.error.is_some() {
            return Verdict::Failed;
        }
        if self.output.contains(marker) {
            return Verdict::ErrorInOutput;
        }
        return Verdict::Success;
    }

    /// Renders the error part for diagnostics, empty if there is none.
    pub fn error_text(&self) -> String {
        return self
            .error
            .as_ref()
            .map(|err| return err.to_string())
            .unwrap_or_default();
    }
}

/// Operations of the container runtime the coordinator depends on.
///
/// Every call blocks until the runtime CLI returns.
#[cfg_attr(test, automock)]
pub trait ContainerRuntime {
    /// Creates and starts a detached container, the output is its id.
    fn run_detached(&self, args: &[String]) -> CommandOutcome;

    /// Blocks until the container exits, the output is its exit code.
    fn wait(&self, handle: &str) -> CommandOutcome;

    fn logs(&self, handle: &str) -> CommandOutcome;

    fn remove(&self, handle: &str) -> CommandOutcome;

    /// Sends `stop` or `kill` to the container.
    fn control(&self, verb: ControlVerb, handle: &str) -> CommandOutcome;
}

#[cfg(test)]
#[path = "../tests/runtime/test_mod.rs"]
mod test_mod;
