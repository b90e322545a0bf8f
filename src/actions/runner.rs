use std::process::Command;

use tracing::debug;

use crate::actions::ActionContext;
use crate::error::{PublishError, Result};

/// Runs module publish commands
pub struct ActionRunner;

impl ActionRunner {
    /// Execute a publish command with the given context
    ///
    /// `command` is a program followed by its arguments; no shell is
    /// involved. Exit code 0 is success, anything else is a failure.
    ///
    /// # Arguments
    /// * `command` - Program and arguments
    /// * `context` - Action context exported as environment variables
    ///
    /// # Returns
    /// * `Ok(())` if the command succeeds (exit code 0)
    /// * `Err(ActionFailed)` if the command is empty, cannot start, or exits non-zero
    pub fn execute(command: &[String], context: &ActionContext) -> Result<()> {
        let (program, args) = command.split_first().ok_or_else(|| {
            PublishError::action(format!("No publish command configured for {}", context.module))
        })?;

        debug!(module = %context.module, program = program.as_str(), "running publish command");
        let output = Command::new(program)
            .args(args)
            .envs(context.to_env_vars())
            .output()
            .map_err(|e| {
                PublishError::action(format!(
                    "Failed to execute '{}' for {}: {}",
                    program, context.module, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(PublishError::action(format!(
                "{} for {} failed with exit code {}\nStdout: {}\nStderr: {}",
                program,
                context.module,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        Ok(())
    }
}
