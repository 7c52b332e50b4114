//! Byte transport to the remote frame

use std::path::Path;

use frame_fs::folded_basename;

use crate::command::ToolCommand;
use crate::config::UploadSettings;
use crate::{Error, Result};

/// Copies one output artifact to the remote store.
pub trait Uploader {
    fn upload(&self, file: &Path) -> Result<()>;
}

/// Runs an `scp`-style command: the configured program and arguments, then
/// the source path and the expanded destination.
#[derive(Debug, Clone)]
pub struct CommandUploader {
    settings: UploadSettings,
    host: String,
}

impl CommandUploader {
    pub fn new(settings: UploadSettings, host: impl Into<String>) -> Self {
        Self {
            settings,
            host: host.into(),
        }
    }

    /// Destination for `file`; the remote name is the lower-cased basename.
    pub fn destination(&self, file: &Path) -> Result<String> {
        let name = folded_basename(file).ok_or_else(|| {
            Error::Fs(frame_fs::Error::NoFileName {
                path: file.to_path_buf(),
            })
        })?;
        Ok(self
            .settings
            .destination
            .replace("{host}", &self.host)
            .replace("{name}", &name))
    }

    pub fn command(&self, file: &Path) -> Result<ToolCommand> {
        let (program, args) = self.settings.command.split_first().ok_or_else(|| {
            Error::InvalidConfig {
                message: "upload.command must name a program".to_string(),
            }
        })?;
        Ok(ToolCommand::new(program)
            .args(args)
            .arg(file)
            .arg(self.destination(file)?))
    }
}

impl Uploader for CommandUploader {
    fn upload(&self, file: &Path) -> Result<()> {
        self.command(file)?.run()
    }
}
