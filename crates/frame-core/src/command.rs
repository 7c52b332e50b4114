//! External program invocation

use std::ffi::OsString;
use std::process::Command;

use crate::{Error, Result};

/// A program plus arguments, run to completion with output captured.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The command line as one string, for logs and errors.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run and wait.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandFailed`] if the program cannot be started or
    /// exits unsuccessfully. The error carries the combined output.
    pub fn run(&self) -> Result<()> {
        tracing::debug!(command = %self.display(), "Running command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| Error::CommandFailed {
                command: self.display(),
                status: "not started".to_string(),
                output: e.to_string(),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(Error::CommandFailed {
            command: self.display(),
            status: output.status.to_string(),
            output: combined.trim().to_string(),
        })
    }
}
