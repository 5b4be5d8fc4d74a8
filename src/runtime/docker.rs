#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};

use log::{debug, warn};

use crate::error::InvocationError;
use crate::runtime::{CommandOutcome, ContainerRuntime, ControlVerb};
use crate::utils::config::RuntimeConfig;
use crate::utils::constants::UNKNOWN_EXIT_CODE;
use crate::utils::display_args;

/// `ContainerRuntime` backed by the docker compatible CLI named in the config.
#[derive(Debug, Clone)]
pub struct DockerCli {
    config: RuntimeConfig,
}

impl DockerCli {
    pub fn new(config: RuntimeConfig) -> Self {
        return DockerCli { config };
    }

    pub fn program(&self) -> &str {
        return &self.config.program;
    }

    /// Runs `<program> <args>` to completion and captures its combined output.
    fn execute(&self, args: &[&str]) -> CommandOutcome {
        debug!("Running `{} {}`", self.program(), display_args(args));
        let outcome = match self.capture_combined(args) {
            Ok((bytes, status)) => outcome_from_status(bytes, status),
            Err(err) => {
                warn!("Failed to launch `{}`: {}", self.program(), err);
                CommandOutcome::failure(
                    "",
                    UNKNOWN_EXIT_CODE,
                    InvocationError::Spawn(err.to_string()),
                )
            }
        };
        debug!(
            "`{} {}` exited with {}",
            self.program(),
            args.first().unwrap_or(&""),
            outcome.exit_code
        );
        return outcome;
    }

    /// Spawns the command with stdout and stderr writing into one pipe.
    ///
    /// Both streams share the pipe, so the bytes keep the order the runtime wrote them in.
    fn capture_combined(&self, args: &[&str]) -> io::Result<(Vec<u8>, ExitStatus)> {
        let (mut reader, writer) = io::pipe()?;
        let mut child = Command::new(self.program())
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .spawn()?;
        // Our write ends died with the builder, so EOF means the child closed its copies
        let mut bytes = Vec::new();
        let read = reader.read_to_end(&mut bytes);
        let status = child.wait()?;
        read?;
        return Ok((bytes, status));
    }
}

fn outcome_from_status(bytes: Vec<u8>, status: ExitStatus) -> CommandOutcome {
    return match status.code() {
        Some(0) => CommandOutcome::from_bytes(bytes, 0, None),
        Some(code) => {
            CommandOutcome::from_bytes(bytes, code, Some(InvocationError::NonZeroExit { code }))
        }
        None => CommandOutcome::from_bytes(
            bytes,
            UNKNOWN_EXIT_CODE,
            Some(InvocationError::Terminated),
        ),
    };
}

impl ContainerRuntime for DockerCli {
    fn run_detached(&self, args: &[String]) -> CommandOutcome {
        let mut full_args: Vec<&str> = vec!["run", "-d"];
        full_args.extend(args.iter().map(|arg| return arg.as_str()));
        return self.execute(&full_args);
    }

    fn wait(&self, handle: &str) -> CommandOutcome {
        return self.execute(&["wait", handle]);
    }

    fn logs(&self, handle: &str) -> CommandOutcome {
        return self.execute(&["logs", handle]);
    }

    fn remove(&self, handle: &str) -> CommandOutcome {
        return self.execute(&["rm", handle]);
    }

    fn control(&self, verb: ControlVerb, handle: &str) -> CommandOutcome {
        return self.execute(&[verb.as_str(), handle]);
    }
}

#[cfg(test)]
#[path = "../tests/runtime/test_docker.rs"]
mod test_docker;
