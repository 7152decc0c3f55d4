pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::console::TerminalConsole;
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{
    cleaner::LocalWorkspace,
    orchestrator::{BuildOrchestrator, BuildRun},
    packager::ProcessPackager,
    BuildPlan,
};
pub use crate::utils::error::{BuildError, Result};
