//! Validated run configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::manifest::{Manifest, RemoteSection, TransformSection, UploadSection};
use super::transfer::TransferSpec;
use crate::{Error, Result};

/// File name looked up when no configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "frame.toml";

/// Where the remote frame lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSettings {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl From<RemoteSection> for RemoteSettings {
    fn from(section: RemoteSection) -> Self {
        Self {
            host: section.host,
            port: section.port,
            timeout: Duration::from_secs(section.timeout_secs),
        }
    }
}

/// Parameters for the command-line image transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSettings {
    pub convert: String,
    pub size: u32,
    pub quality: u32,
    pub autorotate: Option<String>,
    /// Lower-cased, without leading dot
    pub extensions: Vec<String>,
}

impl Default for TransformSettings {
    fn default() -> Self {
        let section = TransformSection::default();
        Self {
            convert: section.convert,
            size: section.size,
            quality: section.quality,
            autorotate: section.autorotate,
            extensions: section.extensions,
        }
    }
}

impl TransformSettings {
    /// Whether `extension` (any case, no dot) is accepted.
    pub fn accepts(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.extensions.iter().any(|e| *e == extension)
    }
}

impl TryFrom<TransformSection> for TransformSettings {
    type Error = Error;

    fn try_from(section: TransformSection) -> Result<Self> {
        if section.convert.trim().is_empty() {
            return Err(Error::invalid("transform.convert must name a program"));
        }
        if section.size == 0 {
            return Err(Error::invalid("transform.size must be at least 1"));
        }
        if !(1..=100).contains(&section.quality) {
            return Err(Error::invalid(format!(
                "transform.quality must be between 1 and 100, got {}",
                section.quality
            )));
        }
        let extensions: Vec<String> = section
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(Error::invalid("transform.extensions must not be empty"));
        }

        Ok(Self {
            convert: section.convert,
            size: section.size,
            quality: section.quality,
            autorotate: section.autorotate.filter(|a| !a.trim().is_empty()),
            extensions,
        })
    }
}

/// Upload command line and destination template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub command: Vec<String>,
    pub destination: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        let section = UploadSection::default();
        Self {
            command: section.command,
            destination: section.destination,
        }
    }
}

impl TryFrom<UploadSection> for UploadSettings {
    type Error = Error;

    fn try_from(section: UploadSection) -> Result<Self> {
        if section.command.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(Error::invalid("upload.command must name a program"));
        }
        if !section.destination.contains("{name}") {
            return Err(Error::invalid(
                "upload.destination must contain the {name} placeholder",
            ));
        }
        Ok(Self {
            command: section.command,
            destination: section.destination,
        })
    }
}

/// Everything one `frame sync` run needs, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub output_path: PathBuf,
    pub remote: Option<RemoteSettings>,
    pub transform: TransformSettings,
    pub upload: UploadSettings,
    pub transfers: Vec<TransferSpec>,
}

impl RunConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if `path` does not exist, and a
    /// parse or validation error for anything malformed. Nothing on disk or
    /// on the network is touched before validation succeeds.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            transfers = config.transfers.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        Self::try_from(Manifest::parse(content)?)
    }
}

impl TryFrom<Manifest> for RunConfig {
    type Error = Error;

    fn try_from(manifest: Manifest) -> Result<Self> {
        if manifest.output_path.as_os_str().is_empty() {
            return Err(Error::invalid("output_path must not be empty"));
        }

        let transfers = manifest
            .transfers
            .into_iter()
            .map(TransferSpec::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            output_path: manifest.output_path,
            remote: manifest.remote.map(RemoteSettings::from),
            transform: TransformSettings::try_from(manifest.transform)?,
            upload: UploadSettings::try_from(manifest.upload)?,
            transfers,
        })
    }
}
