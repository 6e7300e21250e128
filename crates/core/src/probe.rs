//! Availability pre-flight
//!
//! Advisory only: a negative answer never raises. The scheduler uses it to
//! decide between scanning locally and dispatching the task to a remote
//! machine.

use crate::config::RelayConfig;
use crate::error::AdapterError;
use crate::process::{self, RunOptions};

/// Whether the tool is executable on the current host.
pub fn is_usable(config: &RelayConfig) -> bool {
    let args = vec![config.tool.binary.clone(), "--version".to_string()];
    let log = |line: &str| -> Result<(), AdapterError> {
        log::debug!("version probe: {line}");
        Ok(())
    };
    match process::run(
        &args,
        &RunOptions {
            on_stderr_line: Some(&log),
            ..Default::default()
        },
    ) {
        Ok(status) => status.success(),
        Err(_) => false,
    }
}
