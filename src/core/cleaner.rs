use crate::core::{CleanOutcome, CleanTarget, TargetKind, Workspace};
use crate::utils::error::{BuildError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalWorkspace {
    root: PathBuf,
}

impl LocalWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl Workspace for LocalWorkspace {
    async fn check_root(&self) -> Result<()> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(BuildError::InvalidConfigValueError {
                field: "root".to_string(),
                value: self.root.display().to_string(),
                reason: "Project root is not a directory".to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BuildError::InvalidConfigValueError {
                field: "root".to_string(),
                value: self.root.display().to_string(),
                reason: "Project root does not exist".to_string(),
            }),
            Err(e) => Err(BuildError::IoError(e)),
        }
    }

    async fn remove(&self, target: &CleanTarget) -> Result<CleanOutcome> {
        let full_path = self.root.join(&target.path);

        let removed = match target.kind {
            TargetKind::Directory => tokio::fs::remove_dir_all(&full_path).await,
            TargetKind::File => tokio::fs::remove_file(&full_path).await,
        };

        match removed {
            Ok(()) => {
                tracing::debug!("Removed {}", full_path.display());
                Ok(CleanOutcome::Removed)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Nothing to remove at {}", full_path.display());
                Ok(CleanOutcome::Absent)
            }
            Err(source) => Err(BuildError::CleanFailed {
                path: full_path,
                source,
            }),
        }
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(self.root.join(path))
            .await
            .unwrap_or(false)
    }
}
