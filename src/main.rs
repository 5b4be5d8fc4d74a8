#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]
use clap::Parser;
use dockrun_lib::cli::{entrypoint, parse_error_exit_code, Args};

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            std::process::exit(parse_error_exit_code(&err));
        }
    };
    std::process::exit(entrypoint(args).await);
}
