pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Runtime executable used when `--dockrun-runtime` is not given.
pub const DEFAULT_RUNTIME_PROGRAM: &str = "docker";
/// Marker the runtime prints when an operation failed despite exiting with 0.
pub const DEFAULT_ERROR_MARKER: &str = "Error";
/// Marker printed by `logs` for containers that are already gone.
pub const DEFAULT_MISSING_CONTAINER_MARKER: &str = "No such container";

/// Shortest container id we accept from `run -d`.
pub const MIN_HANDLE_LENGTH: usize = 4;
/// Exit code of the coordinator for every usage or infrastructure failure.
pub const FAILURE_EXIT_CODE: i32 = 1;
/// Exit status recorded when the runtime process could not report one.
pub const UNKNOWN_EXIT_CODE: i32 = 127;
pub const SIGNAL_QUEUE_CAPACITY: usize = 1;

/// Flags that would require an attached or interactive session.
pub const UNSUPPORTED_FLAGS: [&str; 4] = ["-i", "--interactive", "-a", "--attach"];
