//! Fakes shared by the frame-core integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use frame_core::{Error, Result, Transform, Uploader};
use frame_remote::{RemoteError, RemoteInventory, RemoteStore};

/// Copies the source to the output and records every call.
#[derive(Debug, Clone, Default)]
pub struct CopyTransform {
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl CopyTransform {
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transform for CopyTransform {
    fn transform(&self, source: &Path, output: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(source.to_path_buf());
        fs::copy(source, output)?;
        Ok(())
    }
}

/// Writes a partial output, then fails, for sources whose name contains
/// `poison`. Everything else is copied.
#[derive(Debug, Clone, Default)]
pub struct PartialTransform;

impl Transform for PartialTransform {
    fn transform(&self, source: &Path, output: &Path) -> Result<()> {
        if source.to_string_lossy().contains("poison") {
            fs::write(output, b"half")?;
            return Err(Error::CommandFailed {
                command: "convert".to_string(),
                status: "exit status: 1".to_string(),
                output: "corrupt JPEG".to_string(),
            });
        }
        fs::copy(source, output)?;
        Ok(())
    }
}

/// In-memory remote: a set of file names. Deletes match names exactly,
/// like a case-sensitive serving filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    pub names: Arc<Mutex<BTreeSet<String>>>,
    pub delete_calls: Arc<Mutex<Vec<Vec<String>>>>,
    pub offline: bool,
}

impl MemoryRemote {
    pub fn with_names(names: &[&str]) -> Self {
        let remote = Self::default();
        remote
            .names
            .lock()
            .unwrap()
            .extend(names.iter().map(|n| n.to_string()));
        remote
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.names.lock().unwrap().iter().cloned().collect()
    }

    pub fn delete_calls(&self) -> Vec<Vec<String>> {
        self.delete_calls.lock().unwrap().clone()
    }

    /// An uploader that adds the lower-cased basename to this remote.
    pub fn uploader(&self) -> MemoryUploader {
        MemoryUploader {
            names: self.names.clone(),
            fail_on: None,
        }
    }
}

impl RemoteStore for MemoryRemote {
    fn list(&self) -> frame_remote::Result<RemoteInventory> {
        if self.offline {
            return Err(RemoteError::Resolve {
                host: "offline".to_string(),
                port: 9999,
            });
        }
        Ok(self.names.lock().unwrap().iter().collect())
    }

    fn delete(&self, names: &[String]) -> frame_remote::Result<usize> {
        self.delete_calls.lock().unwrap().push(names.to_vec());
        let mut stored = self.names.lock().unwrap();
        Ok(names.iter().filter(|n| stored.remove(n.as_str())).count())
    }

    fn endpoint(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct MemoryUploader {
    names: Arc<Mutex<BTreeSet<String>>>,
    fail_on: Option<String>,
}

impl MemoryUploader {
    /// Fail uploads of the file with this lower-cased name.
    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }
}

impl Uploader for MemoryUploader {
    fn upload(&self, file: &Path) -> Result<()> {
        let name = frame_fs::folded_basename(file).unwrap();
        if self.fail_on.as_deref() == Some(name.as_str()) {
            return Err(Error::CommandFailed {
                command: "scp".to_string(),
                status: "exit status: 1".to_string(),
                output: "lost connection".to_string(),
            });
        }
        self.names.lock().unwrap().insert(name);
        Ok(())
    }
}
