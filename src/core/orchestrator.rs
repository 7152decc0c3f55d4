use crate::core::packager::full_command;
use crate::core::{
    BuildPlan, BuildReport, CleanOutcome, CleanRecord, Console, PackageOutcome, Packager,
    Workspace,
};
use crate::utils::error::{BuildError, Result};
use chrono::Utc;
use std::path::PathBuf;

pub const SUCCESS_MESSAGE: &str = "Build complete!";

/// Result of a full run. The report is always populated; `error` is set when the build failed.
#[derive(Debug)]
pub struct BuildRun {
    pub report: BuildReport,
    pub error: Option<BuildError>,
}

impl BuildRun {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn exit_code(&self) -> i32 {
        self.error.as_ref().map(BuildError::exit_code).unwrap_or(0)
    }
}

/// Prints a failure with its recovery suggestion, then holds until acknowledged when `pause` is on.
/// Used for errors raised before an orchestrator exists, such as an unreadable config.
pub async fn report_failure<C: Console + ?Sized>(
    console: &C,
    error: &BuildError,
    pause: bool,
) -> Result<()> {
    console.error(&format!("Build failed: {}", error.user_friendly_message()));
    console.error(&format!("Suggestion: {}", error.recovery_suggestion()));

    if pause {
        console.wait_for_acknowledgment().await?;
    }
    Ok(())
}

pub struct BuildOrchestrator<W: Workspace, P: Packager, C: Console> {
    plan: BuildPlan,
    workspace: W,
    packager: P,
    console: C,
    pause: bool,
}

impl<W: Workspace, P: Packager, C: Console> BuildOrchestrator<W, P, C> {
    pub fn new(plan: BuildPlan, workspace: W, packager: P, console: C) -> Self {
        Self {
            plan,
            workspace,
            packager,
            console,
            pause: true,
        }
    }

    /// Whether `report` waits for the operator before returning.
    pub fn with_pause(mut self, pause: bool) -> Self {
        self.pause = pause;
        self
    }

    pub fn plan(&self) -> &BuildPlan {
        &self.plan
    }

    /// Removes every clean target in order. Stops at the first real failure;
    /// targets that are already gone count as done.
    pub async fn clean(&self) -> Result<Vec<CleanRecord>> {
        let mut records = Vec::with_capacity(self.plan.clean_targets.len());

        for target in &self.plan.clean_targets {
            let outcome = self.workspace.remove(target).await?;
            match outcome {
                CleanOutcome::Removed => tracing::info!("🧹 Removed {}", target.path.display()),
                CleanOutcome::Absent => {
                    tracing::debug!("{} not present, skipping", target.path.display())
                }
            }
            records.push(CleanRecord {
                path: target.path.clone(),
                kind: target.kind,
                outcome,
            });
        }

        Ok(records)
    }

    /// Runs the packaging tool. A non-zero exit becomes `PackagerFailed`.
    pub async fn package(&self) -> Result<PackageOutcome> {
        let outcome = self.packager.package(&self.plan).await?;

        if !outcome.success() {
            tracing::error!(
                "Packaging tool exited with {:?} after {:?}",
                outcome.exit_code,
                outcome.elapsed
            );
            return Err(BuildError::PackagerFailed {
                program: self.plan.packager.program.clone(),
                code: outcome.exit_code,
            });
        }

        tracing::info!("Packaging finished in {:.1}s", outcome.elapsed.as_secs_f64());
        Ok(outcome)
    }

    pub async fn verify_artifact(&self) -> Result<PathBuf> {
        let artifact = self.plan.artifact_file();
        if self.workspace.exists(&artifact).await {
            Ok(self.plan.artifact_path())
        } else {
            Err(BuildError::ArtifactMissing {
                path: self.plan.artifact_path(),
            })
        }
    }

    /// Tells the operator how the run went, then holds until acknowledged when pausing is on.
    pub async fn report(&self, report: &BuildReport, error: Option<&BuildError>) -> Result<()> {
        if let Some(e) = error {
            return report_failure(&self.console, e, self.pause).await;
        }

        self.console.info(SUCCESS_MESSAGE);
        if let Some(artifact) = &report.artifact {
            self.console
                .info(&format!("Executable: {}", artifact.display()));
        }

        if self.pause {
            self.console.wait_for_acknowledgment().await?;
        }
        Ok(())
    }

    /// clean → package → verify → report. `report` runs whatever the outcome.
    pub async fn run(&self) -> BuildRun {
        let mut report = BuildReport::new(full_command(&self.plan));
        tracing::info!("🚀 Building {}", self.plan.entry_script);

        let result = self.execute(&mut report).await;
        report.finished_at = Some(Utc::now());

        match &result {
            Ok(artifact) => {
                report.success = true;
                report.artifact = Some(artifact.clone());
                tracing::info!("✅ Build succeeded: {}", artifact.display());
            }
            Err(e) => {
                report.error = Some(e.to_string());
                tracing::error!(
                    "❌ Build failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
            }
        }

        let error = result.err();
        if let Err(e) = self.report(&report, error.as_ref()).await {
            tracing::warn!("Could not wait for acknowledgment: {}", e);
        }

        BuildRun { report, error }
    }

    async fn execute(&self, report: &mut BuildReport) -> Result<PathBuf> {
        self.workspace.check_root().await?;
        report.cleaned = self.clean().await?;

        match self.package().await {
            Ok(outcome) => {
                report.exit_code = outcome.exit_code;
                report.packaging_ms = Some(outcome.elapsed.as_millis() as u64);
            }
            Err(e) => {
                if let BuildError::PackagerFailed { code, .. } = &e {
                    report.exit_code = *code;
                }
                return Err(e);
            }
        }

        self.verify_artifact().await
    }
}
