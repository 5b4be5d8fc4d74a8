use crate::utils::constants::{
    DEFAULT_ERROR_MARKER, DEFAULT_MISSING_CONTAINER_MARKER, DEFAULT_RUNTIME_PROGRAM,
};

#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Name or path of the container runtime executable.
    /// e.g. `'docker'` or `'podman'`
    pub program: String,
    /// Substring that marks failed `wait`, `rm`, `stop` and `kill` invocations.
    pub error_marker: String,
    /// Substring that marks a failed `logs` invocation.
    pub missing_container_marker: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        return RuntimeConfig {
            program: DEFAULT_RUNTIME_PROGRAM.to_string(),
            error_marker: DEFAULT_ERROR_MARKER.to_string(),
            missing_container_marker: DEFAULT_MISSING_CONTAINER_MARKER.to_string(),
        };
    }
}

impl RuntimeConfig {
    pub fn with_program(program: &str) -> Self {
        return RuntimeConfig {
            program: program.to_string(),
            ..RuntimeConfig::default()
        };
    }
}

#[cfg(test)]
#[path = "../tests/utils/test_config.rs"]
mod test_config;
