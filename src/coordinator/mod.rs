//! Lifecycle of a single detached container.
//!
//! The container is launched and awaited while host signals are relayed to
//! it. Once its exit code is known its logs are printed and it is removed.

#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::oneshot;

use crate::error::{CoordinatorError, WaitFailure};
use crate::runtime::{CommandOutcome, ContainerRuntime, Verdict};
use crate::utils::config::RuntimeConfig;
use crate::utils::constants::MIN_HANDLE_LENGTH;
use crate::utils::{display_args, trim_newlines};
use crate::validation::validate_args;

pub mod signals;
use signals::{HostSignal, SignalSubscription};

/// Container id handed out by `run -d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadHandle(String);

impl WorkloadHandle {
    /// Parses the output of a successful `run -d`.
    pub fn parse(output: &str) -> Result<Self, CoordinatorError> {
        let id = trim_newlines(output);
        if id.chars().count() < MIN_HANDLE_LENGTH {
            return Err(CoordinatorError::InvalidHandle(id.to_string()));
        }
        return Ok(WorkloadHandle(id.to_string()));
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for WorkloadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.0);
    }
}

/// Turns the final `wait` outcome into the container's exit code.
pub fn extract_exit_code(
    outcome: &CommandOutcome,
    error_marker: &str,
) -> Result<i32, CoordinatorError> {
    let cause = match (&outcome.error, outcome.verdict(error_marker)) {
        (Some(err), _) => Some(WaitFailure::Invocation(err.clone())),
        (None, Verdict::ErrorInOutput) => Some(WaitFailure::ErrorInOutput),
        (None, _) => None,
    };
    if let Some(cause) = cause {
        return Err(CoordinatorError::Wait {
            output: outcome.output.clone(),
            cause,
        });
    }
    let text = trim_newlines(&outcome.output);
    return text
        .parse::<i32>()
        .map_err(|_| {
            return CoordinatorError::ExitCodeParse {
                output: text.to_string(),
            };
        });
}

pub struct Coordinator<R, W> {
    runtime: Arc<R>,
    config: RuntimeConfig,
    stdout: W,
}

impl<R, W> Coordinator<R, W>
where
    R: ContainerRuntime + Send + Sync + 'static,
    W: Write,
{
    pub fn new(runtime: R, config: RuntimeConfig, stdout: W) -> Self {
        return Coordinator {
            runtime: Arc::new(runtime),
            config,
            stdout,
        };
    }

    /// Runs the container described by `args` and returns its exit code.
    ///
    /// Only usage errors, launch failures and an unrecoverable `wait` end
    /// the run early. Everything after the exit code is known is best effort.
    pub async fn run(
        &mut self,
        args: Vec<String>,
        signals: &mut SignalSubscription,
    ) -> Result<i32, CoordinatorError> {
        validate_args(&args).map_err(CoordinatorError::Usage)?;
        let handle = self.launch(args).await?;
        let first = self.wait_for_result(&handle, signals).await;
        let exit_code = self.resolve_exit_code(&handle, first).await?;
        info!("Container {handle} exited with {exit_code}");
        self.collect_logs_and_cleanup(&handle).await;
        return Ok(exit_code);
    }

    /// Starts the detached container.
    pub async fn launch(&self, args: Vec<String>) -> Result<WorkloadHandle, CoordinatorError> {
        info!("Launching container with `{}`", display_args(&args));
        let outcome = self
            .invoke(move |runtime| return runtime.run_detached(&args))
            .await;
        if outcome.is_error() {
            error!("Launch failed: {}", outcome.error_text());
            return Err(CoordinatorError::Launch {
                output: outcome.output,
                exit_code: outcome.exit_code,
            });
        }
        let handle = WorkloadHandle::parse(&outcome.output)?;
        debug!("Launched container {handle}");
        return Ok(handle);
    }

    /// Waits for the container in the background while relaying signals.
    ///
    /// Returns the outcome of that background `wait` as is.
    pub async fn wait_for_result(
        &self,
        handle: &WorkloadHandle,
        signals: &mut SignalSubscription,
    ) -> CommandOutcome {
        let (sender, mut receiver) = oneshot::channel::<CommandOutcome>();
        let runtime = Arc::clone(&self.runtime);
        let id = handle.clone();
        tokio::task::spawn_blocking(move || {
            // Receiver is only gone when the coordinator already returned.
            let _ = sender.send(runtime.wait(id.as_str()));
        });

        let mut signals_open = true;
        loop {
            tokio::select! {
                signal = signals.recv(), if signals_open => match signal {
                    Some(signal) => self.relay(signal, handle).await,
                    None => {
                        debug!("Signal subscription closed");
                        signals_open = false;
                    }
                },
                result = &mut receiver => {
                    return result.unwrap_or_else(|_| {
                        return CommandOutcome::aborted("wait task ended without a result");
                    });
                }
            }
        }
    }

    /// Forwards one host signal to the container as `stop` or `kill`.
    async fn relay(&self, signal: HostSignal, handle: &WorkloadHandle) {
        let verb = signal.control_verb();
        eprintln!("Received signal: {signal}; cleaning up");
        info!("Received signal {signal}, sending {verb} to {handle}");
        let id = handle.clone();
        let outcome = self
            .invoke(move |runtime| return runtime.control(verb, id.as_str()))
            .await;
        if outcome.verdict(&self.config.error_marker) != Verdict::Success {
            eprintln!("stopping container via signal {signal} failed");
            warn!(
                "{verb} {handle} failed: {} {}",
                outcome.output,
                outcome.error_text()
            );
        }
    }

    /// Applies the single fallback `wait` and extracts the exit code.
    pub async fn resolve_exit_code(
        &self,
        handle: &WorkloadHandle,
        first: CommandOutcome,
    ) -> Result<i32, CoordinatorError> {
        let outcome = if first.is_error() {
            // A relayed signal can make `wait` lose the exit code of the container.
            warn!(
                "wait {handle} failed ({}), retrying once",
                first.error_text()
            );
            let id = handle.clone();
            self.invoke(move |runtime| return runtime.wait(id.as_str()))
                .await
        } else {
            first
        };
        return extract_exit_code(&outcome, &self.config.error_marker);
    }

    /// Prints the container logs and removes the container.
    ///
    /// Failures are reported but never fail the run.
    pub async fn collect_logs_and_cleanup(&mut self, handle: &WorkloadHandle) {
        let id = handle.clone();
        let logs = self
            .invoke(move |runtime| return runtime.logs(id.as_str()))
            .await;
        if logs.verdict(&self.config.missing_container_marker) == Verdict::Success {
            if let Err(err) = self
                .stdout
                .write_all(&logs.bytes)
                .and_then(|_| return self.stdout.flush())
            {
                warn!("Failed to write logs of {handle}: {err}");
            }
        } else {
            eprintln!("ERROR: logs: {} {}", logs.output, logs.error_text());
            eprintln!("ERROR: logs failed");
            warn!("logs {handle} failed");
        }

        let id = handle.clone();
        let removal = self
            .invoke(move |runtime| return runtime.remove(id.as_str()))
            .await;
        match removal.verdict(&self.config.error_marker) {
            Verdict::Success => debug!("Removed container {handle}"),
            verdict => {
                eprintln!("ERROR: rm: {} {}", removal.output, removal.error_text());
                eprintln!("ERROR: rm failed");
                warn!("rm {handle} failed ({verdict:?})");
            }
        }
    }

    /// Runs one blocking runtime call on the blocking pool and awaits it.
    async fn invoke<F>(&self, operation: F) -> CommandOutcome
    where
        F: FnOnce(&R) -> CommandOutcome + Send + 'static,
    {
        let runtime = Arc::clone(&self.runtime);
        return tokio::task::spawn_blocking(move || return operation(&*runtime))
            .await
            .unwrap_or_else(|err| return CommandOutcome::aborted(&err.to_string()));
    }
}

#[cfg(test)]
#[path = "../tests/coordinator/test_mod.rs"]
mod test_mod;
