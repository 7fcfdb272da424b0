// ABOUTME: Destinations for transformed template output
// ABOUTME: FileSink writes to disk, DryRunSink records and logs what would happen

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::error::{ExecutionError, Result};

#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Create `directory` and any missing parents
    async fn prepare_directory(&self, directory: &Path) -> Result<()>;

    /// Delete a stale output; a missing file is not an error
    async fn remove(&self, path: &Path) -> Result<()>;

    async fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Copy `from` over `to`, replacing any existing file
    async fn copy(&self, from: &Path, to: &Path) -> Result<()>;

    fn is_dry_run(&self) -> bool {
        false
    }
}

pub struct FileSink;

impl Default for FileSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OutputSink for FileSink {
    async fn prepare_directory(&self, directory: &Path) -> Result<()> {
        fs::create_dir_all(directory)
            .await
            .map_err(|e| ExecutionError::file("create directory", directory, e))
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!("Removed stale output {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ExecutionError::file("remove", path, e)),
        }
    }

    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
            .await
            .map_err(|e| ExecutionError::file("write", path, e))?;
        info!("Wrote {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    async fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy(from, to)
            .await
            .map_err(|e| ExecutionError::file("copy to", to, e))?;
        info!("Copied {} to {}", from.display(), to.display());
        Ok(())
    }
}

/// One operation a [`DryRunSink`] was asked to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkAction {
    PrepareDirectory(PathBuf),
    Remove(PathBuf),
    Write { path: PathBuf, bytes: usize },
    Copy { from: PathBuf, to: PathBuf },
}

/// Touches nothing on disk.
#[derive(Default)]
pub struct DryRunSink {
    actions: Mutex<Vec<SinkAction>>,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn actions(&self) -> Vec<SinkAction> {
        self.actions.lock().await.clone()
    }

    async fn record(&self, action: SinkAction) {
        self.actions.lock().await.push(action);
    }
}

#[async_trait]
impl OutputSink for DryRunSink {
    async fn prepare_directory(&self, directory: &Path) -> Result<()> {
        debug!("[dry-run] would create {}", directory.display());
        self.record(SinkAction::PrepareDirectory(directory.to_path_buf()))
            .await;
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        debug!("[dry-run] would remove {}", path.display());
        self.record(SinkAction::Remove(path.to_path_buf())).await;
        Ok(())
    }

    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        info!("[dry-run] would write {} ({} bytes)", path.display(), content.len());
        self.record(SinkAction::Write {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
        .await;
        Ok(())
    }

    async fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        info!("[dry-run] would copy {} to {}", from.display(), to.display());
        self.record(SinkAction::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        })
        .await;
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}
