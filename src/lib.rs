#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]
use std::fs::{create_dir_all, File};
use std::path::PathBuf;

use simplelog::{format_description, ConfigBuilder, LevelFilter, WriteLogger};

use crate::error::LoggerError;
use crate::utils::constants::PKG_NAME;

pub mod cli;
pub mod coordinator;
pub mod error;
pub mod runtime;
pub mod utils;
pub mod validation;

/// Directory debug log files are written to.
pub fn log_directory() -> PathBuf {
    return std::env::temp_dir().join(format!("{PKG_NAME}-logs"));
}

/// Path of a new log file for `name`, unique per start time.
pub fn log_file_path(name: &str) -> PathBuf {
    let utc_now = chrono::offset::Utc::now()
        .format("%Y-%m-%d_%H-%M-%S.%f")
        .to_string();
    return log_directory().join(format!("{utc_now}_{name}.log"));
}

/// Installs a debug level file logger and routes panics into it.
///
/// Returns the path of the log file.
pub fn init_logger(name: &str) -> Result<PathBuf, LoggerError> {
    create_dir_all(log_directory())?;
    let path = log_file_path(name);
    WriteLogger::init(
        LevelFilter::Debug,
        ConfigBuilder::new()
            .set_time_format_custom(format_description!("[hour]:[minute]:[second].[subsecond]"))
            .build(),
        File::create(&path)?,
    )?;
    log_panics::init();
    return Ok(path);
}

#[cfg(test)]
#[path = "./tests/test_lib.rs"]
mod test_lib;
