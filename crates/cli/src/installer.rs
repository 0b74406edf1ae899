//! Dependency bootstrap collaborator.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tracing::info;

pub trait Installer: Send + Sync {
    fn install(&self, path: &Path) -> Result<()>;
}

/// Runs `npm install` in the target directory.
pub struct NpmInstaller;

impl NpmInstaller {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NpmInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl Installer for NpmInstaller {
    fn install(&self, path: &Path) -> Result<()> {
        info!(path = %path.display(), "Installing dependencies");

        let status = Command::new("npm")
            .arg("install")
            .current_dir(path)
            .status()
            .context("Failed to spawn npm install")?;

        if !status.success() {
            bail!("Failed to bootstrap dependencies");
        }
        Ok(())
    }
}

/// Records install requests without touching the system. Test double.
#[derive(Default)]
pub struct RecordingInstaller {
    calls: Mutex<Vec<PathBuf>>,
}

impl RecordingInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl Installer for RecordingInstaller {
    fn install(&self, path: &Path) -> Result<()> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}
