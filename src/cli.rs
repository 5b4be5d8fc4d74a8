//! CLI interface

#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use std::io;

use clap::{ArgAction, Parser};
use log::{error, info};

use crate::coordinator::signals::SignalSubscription;
use crate::coordinator::Coordinator;
use crate::error::CoordinatorError;
use crate::init_logger;
use crate::runtime::DockerCli;
use crate::utils::config::RuntimeConfig;
use crate::utils::constants::{DEFAULT_RUNTIME_PROGRAM, FAILURE_EXIT_CODE};
use crate::validation::USAGE;

/// Runs a container to completion like an ordinary command
///
/// The container is started detached and host termination signals are
/// relayed to it. Once it exited its logs are printed and it is removed.
/// dockrun exits with the container's exit code.
///
/// dockrun's own options must come first, every other argument is
/// forwarded to `<runtime> run -d`.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Args {
    /// Container runtime executable
    #[clap(
        long = "dockrun-runtime",
        value_name = "PROGRAM",
        default_value = DEFAULT_RUNTIME_PROGRAM
    )]
    runtime: String,
    /// Enable extensive logging
    #[clap(long = "dockrun-debug", action = ArgAction::SetTrue)]
    debug: bool,
    /// Print help
    #[clap(long = "dockrun-help", action = ArgAction::Help)]
    help: Option<bool>,
    /// Print version
    #[clap(long = "dockrun-version", action = ArgAction::Version)]
    version: Option<bool>,
    /// [OPTIONS] IMAGE [COMMAND...] forwarded to `run -d`
    #[clap(
        value_name = "ARGS",
        allow_hyphen_values = true,
        trailing_var_arg = true
    )]
    run_args: Vec<String>,
}

impl Args {
    pub fn runtime_config(&self) -> RuntimeConfig {
        return RuntimeConfig::with_program(&self.runtime);
    }
}

/// Reports a fatal coordinator error the way the user expects to read it.
fn report(err: &CoordinatorError) {
    match err {
        CoordinatorError::Usage(problems) => {
            for problem in problems {
                eprintln!("ERROR: {problem}");
            }
            eprintln!("{USAGE}");
        }
        _ => eprintln!("ERROR: {err}"),
    }
}

/// The main entrypoint
///
/// Sets up logging and the signal subscription, then runs the container
/// and returns the exit code the process should terminate with.
pub async fn entrypoint(args: Args) -> i32 {
    if args.debug {
        match init_logger("dockrun") {
            Ok(path) => eprintln!("Logging to {}", path.display()),
            Err(err) => eprintln!("Failed to set up logging: {err}"),
        }
    }

    let mut signals = match SignalSubscription::listen() {
        Ok(signals) => signals,
        Err(err) => {
            eprintln!("ERROR: failed to listen for signals: {err}");
            error!("Failed to listen for signals: {err}");
            return FAILURE_EXIT_CODE;
        }
    };

    let config = args.runtime_config();
    let runtime = DockerCli::new(config.clone());
    let mut coordinator = Coordinator::new(runtime, config, io::stdout());
    return match coordinator.run(args.run_args, &mut signals).await {
        Ok(exit_code) => {
            info!("Exiting with {exit_code}");
            exit_code
        }
        Err(err) => {
            error!("{err}");
            report(&err);
            err.exit_code()
        }
    };
}

/// Exit code for a command line clap rejected or answered itself.
///
/// Help and version requests succeed, everything else is a usage error.
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        return FAILURE_EXIT_CODE;
    }
    return 0;
}

#[cfg(test)]
#[path = "./tests/test_cli.rs"]
mod test_cli;
