//! Disk usage reporting capability.
//!
//! The extractor never spawns processes itself. It asks a [`DiskUsageSource`]
//! for the textual report of a device path, which lets parsing be exercised
//! with canned output and keeps the process boundary in one place.

use std::process::Command;
use tracing::debug;

/// Default program used to report disk usage.
pub const DEFAULT_DF_COMMAND: &str = "df";

/// Default arguments: POSIX output (one row per device) in 1K blocks.
pub const DEFAULT_DF_ARGS: &[&str] = &["-P", "-k"];

/// Failure to obtain a report from the external command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {}: {stderr}", describe_exit(.code))]
    Exit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "signal".to_string(),
    }
}

/// Produces tabular disk usage text for a device path.
pub trait DiskUsageSource: Send + Sync {
    fn report(&self, device_path: &str) -> Result<String, CommandError>;
}

impl<F> DiskUsageSource for F
where
    F: Fn(&str) -> Result<String, CommandError> + Send + Sync,
{
    fn report(&self, device_path: &str) -> Result<String, CommandError> {
        self(device_path)
    }
}

/// Runs `program args... <device_path>` and captures stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfCommand {
    program: String,
    args: Vec<String>,
}

impl Default for DfCommand {
    fn default() -> Self {
        Self::new(
            DEFAULT_DF_COMMAND,
            DEFAULT_DF_ARGS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl DfCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl DiskUsageSource for DfCommand {
    fn report(&self, device_path: &str) -> Result<String, CommandError> {
        debug!("Running {} {:?} {}", self.program, self.args, device_path);

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(device_path)
            .output()
            .map_err(|source| CommandError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CommandError::Exit {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
