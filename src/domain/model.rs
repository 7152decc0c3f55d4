use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Directory,
    File,
}

/// A leftover build output removed before packaging. `path` is relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanTarget {
    pub path: PathBuf,
    pub kind: TargetKind,
}

impl CleanTarget {
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::Directory,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::File,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanOutcome {
    Removed,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub path: PathBuf,
    pub kind: TargetKind,
    pub outcome: CleanOutcome,
}

/// Non-code file copied into the bundle, passed to PyInstaller as `--add-data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFile {
    pub source: String,
    #[serde(default = "default_data_destination")]
    pub destination: String,
}

fn default_data_destination() -> String {
    ".".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagerSpec {
    pub program: String,
    /// Arguments placed before the packaging flags, e.g. `["-m", "PyInstaller"]`.
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub root: PathBuf,
    pub packager: PackagerSpec,
    pub entry_script: String,
    pub hidden_imports: Vec<String>,
    pub onefile: bool,
    pub name: Option<String>,
    pub data_files: Vec<DataFile>,
    pub extra_args: Vec<String>,
    pub clean_targets: Vec<CleanTarget>,
    pub dist_dir: String,
}

impl BuildPlan {
    pub fn from_config<C: ConfigProvider + ?Sized>(root: impl Into<PathBuf>, config: &C) -> Self {
        Self {
            root: root.into(),
            packager: PackagerSpec {
                program: config.packager_program().to_string(),
                args: config.packager_args().to_vec(),
            },
            entry_script: config.entry_script().to_string(),
            hidden_imports: config.hidden_imports().to_vec(),
            onefile: config.onefile(),
            name: config.bundle_name().map(str::to_string),
            data_files: config.data_files().to_vec(),
            extra_args: config.extra_args().to_vec(),
            clean_targets: config.clean_targets(),
            dist_dir: config.dist_dir().to_string(),
        }
    }

    /// Name PyInstaller gives the bundle: `--name` when set, otherwise the entry script's stem.
    pub fn bundle_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => Path::new(&self.entry_script)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.entry_script.clone()),
        }
    }

    /// Where the executable is expected once the packaging tool exits cleanly,
    /// relative to the project root.
    pub fn artifact_file(&self) -> PathBuf {
        let name = self.bundle_name();
        let executable = format!("{}{}", name, std::env::consts::EXE_SUFFIX);
        let dist = PathBuf::from(&self.dist_dir);
        if self.onefile {
            dist.join(executable)
        } else {
            dist.join(name).join(executable)
        }
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.root.join(self.artifact_file())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageOutcome {
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl PackageOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Summary of one orchestrator run, written out with `--report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub command: Vec<String>,
    pub cleaned: Vec<CleanRecord>,
    pub exit_code: Option<i32>,
    pub packaging_ms: Option<u64>,
    pub artifact: Option<PathBuf>,
    pub success: bool,
    pub error: Option<String>,
}

impl BuildReport {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            command,
            cleaned: Vec::new(),
            exit_code: None,
            packaging_ms: None,
            artifact: None,
            success: false,
            error: None,
        }
    }

    /// Writes the report as pretty JSON, creating parent directories as needed.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(entry: &str, name: Option<&str>, onefile: bool) -> BuildPlan {
        BuildPlan {
            root: PathBuf::from("project"),
            packager: PackagerSpec {
                program: "pyinstaller".to_string(),
                args: vec![],
            },
            entry_script: entry.to_string(),
            hidden_imports: vec!["MetaTrader5".to_string()],
            onefile,
            name: name.map(str::to_string),
            data_files: vec![],
            extra_args: vec![],
            clean_targets: vec![],
            dist_dir: "dist".to_string(),
        }
    }

    #[test]
    fn test_bundle_name_defaults_to_entry_stem() {
        assert_eq!(plan("main.py", None, true).bundle_name(), "main");
        assert_eq!(plan("app/gui.pyw", None, true).bundle_name(), "gui");
        assert_eq!(plan("main.py", Some("SignalBot"), true).bundle_name(), "SignalBot");
    }

    #[test]
    fn test_artifact_path_by_mode() {
        let exe = format!("main{}", std::env::consts::EXE_SUFFIX);

        let onefile = plan("main.py", None, true);
        assert_eq!(onefile.artifact_path(), PathBuf::from("project/dist").join(&exe));

        let onedir = plan("main.py", None, false);
        assert_eq!(onedir.artifact_file(), PathBuf::from("dist/main").join(&exe));
        assert_eq!(onedir.artifact_path(), PathBuf::from("project/dist/main").join(&exe));
    }

    #[test]
    fn test_package_outcome_success() {
        let ok = PackageOutcome {
            exit_code: Some(0),
            elapsed: Duration::from_secs(1),
        };
        let failed = PackageOutcome {
            exit_code: Some(1),
            elapsed: Duration::from_secs(1),
        };
        let killed = PackageOutcome {
            exit_code: None,
            elapsed: Duration::from_secs(1),
        };
        assert!(ok.success());
        assert!(!failed.success());
        assert!(!killed.success());
    }

    #[test]
    fn test_report_serializes_outcomes_lowercase() {
        let mut report = BuildReport::new(vec!["pyinstaller".to_string()]);
        report.cleaned.push(CleanRecord {
            path: PathBuf::from("build"),
            kind: TargetKind::Directory,
            outcome: CleanOutcome::Absent,
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cleaned"][0]["kind"], "directory");
        assert_eq!(json["cleaned"][0]["outcome"], "absent");
        assert_eq!(json["success"], false);
    }

    #[test]
    fn test_write_json_creates_parent_directories() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("reports/build.json");

        let mut report = BuildReport::new(vec!["pyinstaller".to_string(), "main.py".to_string()]);
        report.success = true;
        report.write_json(&path).unwrap();

        let written: BuildReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written.success);
        assert_eq!(written.command, vec!["pyinstaller", "main.py"]);
    }
}
