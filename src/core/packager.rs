use crate::core::{BuildPlan, PackageOutcome, Packager};
use crate::utils::error::{BuildError, Result};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// PyInstaller's `--add-data` separator follows the host's PATH separator.
pub fn data_separator() -> &'static str {
    if cfg!(windows) {
        ";"
    } else {
        ":"
    }
}

/// Arguments handed to the packaging program, in the order PyInstaller expects them:
/// leading args, mode, name, hidden imports, data files, extras, entry script.
pub fn command_line(plan: &BuildPlan) -> Vec<String> {
    let mut args = plan.packager.args.clone();

    args.push(if plan.onefile { "--onefile" } else { "--onedir" }.to_string());

    if let Some(name) = &plan.name {
        args.push(format!("--name={}", name));
    }

    for module in &plan.hidden_imports {
        args.push(format!("--hidden-import={}", module));
    }

    for data in &plan.data_files {
        args.push(format!(
            "--add-data={}{}{}",
            data.source,
            data_separator(),
            data.destination
        ));
    }

    args.extend(plan.extra_args.iter().cloned());
    args.push(plan.entry_script.clone());
    args
}

pub fn full_command(plan: &BuildPlan) -> Vec<String> {
    std::iter::once(plan.packager.program.clone())
        .chain(command_line(plan))
        .collect()
}

/// Shell-style rendering for logs and dry runs.
pub fn display_command(plan: &BuildPlan) -> String {
    full_command(plan)
        .iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("\"{}\"", arg)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs the packaging tool as a child process with the console inherited,
/// so the operator sees its output live.
#[derive(Debug, Clone, Default)]
pub struct ProcessPackager;

impl ProcessPackager {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Packager for ProcessPackager {
    async fn package(&self, plan: &BuildPlan) -> Result<PackageOutcome> {
        let program = &plan.packager.program;
        tracing::info!("📦 Running: {}", display_command(plan));
        tracing::debug!("Packager working directory: {}", plan.root.display());

        let started = Instant::now();
        let status = Command::new(program)
            .args(command_line(plan))
            .current_dir(&plan.root)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BuildError::PackagerNotFound {
                        program: program.clone(),
                    }
                } else {
                    BuildError::PackagerSpawnError {
                        program: program.clone(),
                        source: e,
                    }
                }
            })?;

        let outcome = PackageOutcome {
            exit_code: status.code(),
            elapsed: started.elapsed(),
        };
        tracing::debug!(
            "Packager exited with {:?} after {:?}",
            outcome.exit_code,
            outcome.elapsed
        );
        Ok(outcome)
    }
}
