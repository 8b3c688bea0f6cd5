//! Process runner backed by real `npm`/`nrm` executables.

use multireg_core::{CommandLine, Error, Runner};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, trace};

/// Runs commands as child processes in the project directory.
pub struct SystemRunner {
    cwd: PathBuf,
}

impl SystemRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    fn command(&self, command: &CommandLine) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).current_dir(&self.cwd);
        cmd
    }
}

impl Runner for SystemRunner {
    fn run(&mut self, command: &CommandLine) -> Result<bool, Error> {
        debug!(command = %command, "spawning");

        let status = self
            .command(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| Error::CommandSpawn {
                command: command.to_string(),
                source,
            })?;

        debug!(command = %command, code = ?status.code(), "exited");
        Ok(status.success())
    }

    fn capture(&mut self, command: &CommandLine) -> Result<String, Error> {
        debug!(command = %command, "capturing");

        let output = self
            .command(command)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| Error::CommandSpawn {
                command: command.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: command.to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!(command = %command, stdout = %stdout.trim(), "captured");
        Ok(stdout)
    }
}
