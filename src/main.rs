use clap::Parser;
use onefile_build::adapters::console::stdin_is_interactive;
use onefile_build::core::orchestrator::report_failure;
use onefile_build::core::packager::display_command;
use onefile_build::core::TargetKind;
use onefile_build::utils::{logger, validation::Validate};
use onefile_build::{
    BuildError, BuildOrchestrator, BuildPlan, CliConfig, LocalWorkspace, ProcessPackager,
    TerminalConsole, TomlConfig,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.log_format);

    tracing::info!("Starting onefile-build");
    tracing::debug!("CLI config: {:?}", cli);

    let console = TerminalConsole::new();
    let interactive = stdin_is_interactive();

    // 載入 TOML 配置
    let (mut config, source) = match TomlConfig::load(cli.config.as_deref(), &cli.root) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            let pause = !cli.dry_run && cli.resolve_pause(None, interactive);
            show_failure(&console, &e, pause).await;
            std::process::exit(e.exit_code());
        }
    };
    match &source {
        Some(path) => tracing::info!("📁 Configuration loaded from: {}", path.display()),
        None => tracing::debug!("No configuration file, using built-in defaults"),
    }

    cli.apply_overrides(&mut config);
    let pause = !cli.dry_run && cli.resolve_pause(config.output.pause, interactive);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        show_failure(&console, &e, pause).await;
        std::process::exit(e.exit_code());
    }

    let plan = BuildPlan::from_config(&cli.root, &config);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be removed or built");
        display_plan(&plan);
        return Ok(());
    }

    let orchestrator = BuildOrchestrator::new(
        plan,
        LocalWorkspace::new(&cli.root),
        ProcessPackager::new(),
        console,
    )
    .with_pause(pause);

    let run = orchestrator.run().await;

    if let Some(report_path) = &config.output.report {
        if let Err(e) = run.report.write_json(Path::new(report_path)) {
            tracing::warn!("Could not write build report to {}: {}", report_path, e);
        } else {
            tracing::info!("📝 Build report written to: {}", report_path);
        }
    }

    let exit_code = run.exit_code();
    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn show_failure(console: &TerminalConsole, error: &BuildError, pause: bool) {
    if let Err(e) = report_failure(console, error, pause).await {
        tracing::warn!("Could not wait for acknowledgment: {}", e);
    }
}

fn display_plan(plan: &BuildPlan) {
    println!("Project root: {}", plan.root.display());
    println!("Clean targets:");
    for target in &plan.clean_targets {
        let kind = match target.kind {
            TargetKind::Directory => "dir ",
            TargetKind::File => "file",
        };
        println!("  {} {}", kind, target.path.display());
    }
    println!("Command: {}", display_command(plan));
    println!("Expected artifact: {}", plan.artifact_path().display());
}
