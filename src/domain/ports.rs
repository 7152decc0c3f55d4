use crate::domain::model::{BuildPlan, CleanOutcome, CleanTarget, DataFile, PackageOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Filesystem the orchestrator cleans and inspects.
#[async_trait]
pub trait Workspace: Send + Sync {
    /// Fails unless the project root is an existing directory.
    async fn check_root(&self) -> Result<()>;
    /// Removes `target`. A target that does not exist yields `CleanOutcome::Absent`.
    async fn remove(&self, target: &CleanTarget) -> Result<CleanOutcome>;
    async fn exists(&self, path: &Path) -> bool;
}

#[async_trait]
pub trait Packager: Send + Sync {
    /// Runs the packaging tool to completion. A non-zero exit is an outcome, not an error.
    async fn package(&self, plan: &BuildPlan) -> Result<PackageOutcome>;
}

/// Operator-facing output and the end-of-run acknowledgment.
#[async_trait]
pub trait Console: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
    async fn wait_for_acknowledgment(&self) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn packager_program(&self) -> &str;
    fn packager_args(&self) -> &[String];
    fn entry_script(&self) -> &str;
    fn hidden_imports(&self) -> &[String];
    fn onefile(&self) -> bool;
    fn bundle_name(&self) -> Option<&str>;
    fn data_files(&self) -> &[DataFile];
    fn extra_args(&self) -> &[String];
    fn clean_targets(&self) -> Vec<CleanTarget>;
    fn dist_dir(&self) -> &str;
}
