//! Raw `frame.toml` structure
//!
//! These types mirror the file one to one. They are deserialized with
//! unknown keys rejected and then validated into [`RunConfig`](super::RunConfig).

use std::path::PathBuf;

use serde::Deserialize;

use frame_filters::sampler::{DEFAULT_INTERVAL_MINUTES, DEFAULT_SLICES};
use frame_remote::DEFAULT_PORT;

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_convert() -> String {
    "convert".to_string()
}

fn default_size() -> u32 {
    2048
}

fn default_quality() -> u32 {
    55
}

fn default_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string()]
}

fn default_upload_command() -> Vec<String> {
    vec!["scp".to_string(), "-q".to_string()]
}

fn default_destination() -> String {
    "pi@{host}:photos/{name}".to_string()
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_MINUTES
}

fn default_slices() -> u64 {
    DEFAULT_SLICES
}

/// Top level of `frame.toml`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Directory holding transformed artifacts
    pub output_path: PathBuf,

    /// Remote frame; reconciliation is skipped without it
    #[serde(default)]
    pub remote: Option<RemoteSection>,

    #[serde(default)]
    pub transform: TransformSection,

    #[serde(default)]
    pub upload: UploadSection,

    /// One entry per `[[transfer]]` table
    #[serde(default, rename = "transfer")]
    pub transfers: Vec<TransferSection>,
}

impl Manifest {
    /// Parse a manifest from TOML content
    pub fn parse(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteSection {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformSection {
    /// ImageMagick `convert` binary
    #[serde(default = "default_convert")]
    pub convert: String,
    /// Longest edge of the output, in pixels
    #[serde(default = "default_size")]
    pub size: u32,
    /// JPEG quality of the output
    #[serde(default = "default_quality")]
    pub quality: u32,
    /// `jhead` binary used for `-autorot`
    #[serde(default)]
    pub autorotate: Option<String>,
    /// Source extensions accepted for transformation
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for TransformSection {
    fn default() -> Self {
        Self {
            convert: default_convert(),
            size: default_size(),
            quality: default_quality(),
            autorotate: None,
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadSection {
    /// Program and leading arguments; source and destination are appended
    #[serde(default = "default_upload_command")]
    pub command: Vec<String>,
    /// Destination template with `{host}` and `{name}` placeholders
    #[serde(default = "default_destination")]
    pub destination: String,
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            command: default_upload_command(),
            destination: default_destination(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferSection {
    pub path: PathBuf,
    #[serde(default)]
    pub local: Vec<LocalStageSection>,
    #[serde(default)]
    pub global: Vec<GlobalStageSection>,
}

/// A local stage record, selected by its `stage` key
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case", deny_unknown_fields)]
pub enum LocalStageSection {
    PathPattern {
        #[serde(default)]
        dir: Option<String>,
        #[serde(default)]
        file: Option<String>,
    },
    Curation {},
}

/// A global stage record, selected by its `stage` key
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case", deny_unknown_fields)]
pub enum GlobalStageSection {
    Recent {
        #[serde(default)]
        pick: Option<usize>,
    },
    Sample {
        #[serde(default)]
        pick: Option<usize>,
        #[serde(default = "default_interval")]
        interval: u64,
        #[serde(default = "default_slices")]
        slices: u64,
    },
}
