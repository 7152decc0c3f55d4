pub mod cleaner;
pub mod orchestrator;
pub mod packager;

pub use crate::domain::model::{
    BuildPlan, BuildReport, CleanOutcome, CleanRecord, CleanTarget, DataFile, PackageOutcome,
    PackagerSpec, TargetKind,
};
pub use crate::domain::ports::{ConfigProvider, Console, Packager, Workspace};
pub use crate::utils::error::Result;
