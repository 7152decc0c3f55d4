pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "onefile-build")]
#[command(about = "Clean previous build output and bundle a Python script into a single executable")]
pub struct CliConfig {
    /// Path to TOML build configuration (default: onefile-build.toml in the root, if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Project root; clean targets and the packager run relative to it
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Entry script to bundle
    #[arg(long)]
    pub entry: Option<String>,

    /// Module forced into the bundle; repeat to pass several. Replaces the configured list
    #[arg(long = "hidden-import", value_name = "MODULE")]
    pub hidden_imports: Vec<String>,

    /// Packaging tool to run
    #[arg(long)]
    pub packager: Option<String>,

    /// Name of the produced executable
    #[arg(long)]
    pub name: Option<String>,

    /// Produce a directory bundle instead of a single file
    #[arg(long)]
    pub onedir: bool,

    /// Show what would be cleaned and run without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Exit without waiting for Enter
    #[arg(long, conflicts_with = "pause")]
    pub no_pause: bool,

    /// Wait for Enter even when stdin is not a terminal
    #[arg(long)]
    pub pause: bool,

    /// Write a JSON build report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 套用命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(entry) = &self.entry {
            config.bundle.entry = entry.clone();
            tracing::info!("🔧 Entry script overridden to: {}", entry);
        }
        if !self.hidden_imports.is_empty() {
            config.bundle.hidden_imports = self.hidden_imports.clone();
            tracing::info!("🔧 Hidden imports overridden to: {:?}", self.hidden_imports);
        }
        if let Some(packager) = &self.packager {
            config.packager.program = packager.clone();
            config.packager.args.clear();
            tracing::info!("🔧 Packager overridden to: {}", packager);
        }
        if let Some(name) = &self.name {
            config.bundle.name = Some(name.clone());
        }
        if self.onedir {
            config.packager.onefile = false;
        }
        if let Some(report) = &self.report {
            config.output.report = Some(report.to_string_lossy().into_owned());
        }
    }

    /// `--pause`/`--no-pause` win over the config file, which wins over terminal detection.
    pub fn resolve_pause(&self, configured: Option<bool>, interactive: bool) -> bool {
        if self.no_pause {
            false
        } else if self.pause {
            true
        } else {
            configured.unwrap_or(interactive)
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_no_arguments_means_batch_defaults() {
        let cli = CliConfig::parse_from(["onefile-build"]);
        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(config.entry_script(), "main.py");
        assert_eq!(config.hidden_imports(), ["MetaTrader5"]);
        assert!(config.onefile());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let cli = CliConfig::parse_from([
            "onefile-build",
            "--entry",
            "mt5_preload.py",
            "--hidden-import",
            "MetaTrader5",
            "--hidden-import",
            "numpy",
            "--packager",
            "pyinstaller.exe",
            "--name",
            "preload",
            "--onedir",
            "--report",
            "report.json",
        ]);

        let mut config = TomlConfig::default();
        config.packager.args = vec!["-m".to_string(), "PyInstaller".to_string()];
        cli.apply_overrides(&mut config);

        assert_eq!(config.bundle.entry, "mt5_preload.py");
        assert_eq!(config.bundle.hidden_imports, vec!["MetaTrader5", "numpy"]);
        assert_eq!(config.packager.program, "pyinstaller.exe");
        assert!(config.packager.args.is_empty());
        assert_eq!(config.bundle.name.as_deref(), Some("preload"));
        assert!(!config.packager.onefile);
        assert_eq!(config.output.report.as_deref(), Some("report.json"));
        assert_eq!(config.clean_files(), vec!["preload.spec"]);
    }

    #[test]
    fn test_pause_resolution() {
        let default = CliConfig::parse_from(["onefile-build"]);
        assert!(default.resolve_pause(None, true));
        assert!(!default.resolve_pause(None, false));
        assert!(!default.resolve_pause(Some(false), true));

        let no_pause = CliConfig::parse_from(["onefile-build", "--no-pause"]);
        assert!(!no_pause.resolve_pause(Some(true), true));

        let pause = CliConfig::parse_from(["onefile-build", "--pause"]);
        assert!(pause.resolve_pause(Some(false), false));

        assert!(CliConfig::try_parse_from(["onefile-build", "--pause", "--no-pause"]).is_err());
    }
}
