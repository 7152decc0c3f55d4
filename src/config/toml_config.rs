use crate::core::{CleanTarget, ConfigProvider, DataFile};
use crate::utils::error::{BuildError, Result};
use crate::utils::validation::{
    validate_file_extensions, validate_module_name, validate_non_empty_string,
    validate_relative_path, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "onefile-build.toml";

const ENTRY_EXTENSIONS: &[&str] = &["py", "pyw"];

/// Build configuration. Every section is optional; the defaults reproduce
/// `pyinstaller --onefile --hidden-import=MetaTrader5 main.py` after cleaning
/// `build/`, `dist/` and `main.spec`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub packager: PackagerConfig,
    pub bundle: BundleConfig,
    pub clean: CleanConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagerConfig {
    pub program: String,
    pub args: Vec<String>,
    pub onefile: bool,
    pub extra_args: Vec<String>,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            program: "pyinstaller".to_string(),
            args: Vec::new(),
            onefile: true,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub entry: String,
    pub name: Option<String>,
    pub hidden_imports: Vec<String>,
    pub data: Vec<DataFile>,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            entry: "main.py".to_string(),
            name: None,
            hidden_imports: vec!["MetaTrader5".to_string()],
            data: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub directories: Vec<String>,
    /// Defaults to `<bundle name>.spec` when omitted.
    pub files: Option<Vec<String>>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            directories: vec!["build".to_string(), "dist".to_string()],
            files: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dist_dir: String,
    pub pause: Option<bool>,
    pub report: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dist_dir: "dist".to_string(),
            pause: None,
            report: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BuildError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BuildError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Explicit path if given, else `onefile-build.toml` under `root` when it exists,
    /// else built-in defaults.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        let candidate = root.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Ok((Self::from_file(&candidate)?, Some(candidate)))
        } else {
            Ok((Self::default(), None))
        }
    }

    /// 替換環境變數 (例如 ${PYINSTALLER})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BuildError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("packager.program", &self.packager.program)?;

        validate_relative_path("bundle.entry", &self.bundle.entry)?;
        validate_file_extensions(
            "bundle.entry",
            std::slice::from_ref(&self.bundle.entry),
            ENTRY_EXTENSIONS,
        )?;

        if let Some(name) = &self.bundle.name {
            validate_non_empty_string("bundle.name", name)?;
        }

        if self.bundle.hidden_imports.is_empty() {
            return Err(BuildError::MissingConfigError {
                field: "bundle.hidden_imports".to_string(),
            });
        }
        for module in &self.bundle.hidden_imports {
            validate_module_name("bundle.hidden_imports", module)?;
        }

        for data in &self.bundle.data {
            validate_non_empty_string("bundle.data.source", &data.source)?;
            validate_non_empty_string("bundle.data.destination", &data.destination)?;
        }

        for dir in &self.clean.directories {
            validate_relative_path("clean.directories", dir)?;
        }
        for file in self.clean_files() {
            validate_relative_path("clean.files", &file)?;
        }

        validate_relative_path("output.dist_dir", &self.output.dist_dir)?;
        let dist = lexical(&self.output.dist_dir);
        if !self
            .clean
            .directories
            .iter()
            .any(|dir| dist.starts_with(lexical(dir)))
        {
            return Err(BuildError::ConfigValidationError {
                field: "output.dist_dir".to_string(),
                message: format!(
                    "'{}' must also be listed in clean.directories so stale executables are removed",
                    self.output.dist_dir
                ),
            });
        }

        Ok(())
    }

    fn resolved_name(&self) -> String {
        match &self.bundle.name {
            Some(name) => name.clone(),
            None => Path::new(&self.bundle.entry)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.bundle.entry.clone()),
        }
    }

    pub fn clean_files(&self) -> Vec<String> {
        match &self.clean.files {
            Some(files) => files.clone(),
            None => vec![format!("{}.spec", self.resolved_name())],
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn packager_program(&self) -> &str {
        &self.packager.program
    }

    fn packager_args(&self) -> &[String] {
        &self.packager.args
    }

    fn entry_script(&self) -> &str {
        &self.bundle.entry
    }

    fn hidden_imports(&self) -> &[String] {
        &self.bundle.hidden_imports
    }

    fn onefile(&self) -> bool {
        self.packager.onefile
    }

    fn bundle_name(&self) -> Option<&str> {
        self.bundle.name.as_deref()
    }

    fn data_files(&self) -> &[DataFile] {
        &self.bundle.data
    }

    fn extra_args(&self) -> &[String] {
        &self.packager.extra_args
    }

    fn clean_targets(&self) -> Vec<CleanTarget> {
        self.clean
            .directories
            .iter()
            .map(CleanTarget::directory)
            .chain(self.clean_files().into_iter().map(CleanTarget::file))
            .collect()
    }

    fn dist_dir(&self) -> &str {
        &self.output.dist_dir
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

/// Drops `.` components so `./dist` and `dist` compare equal.
fn lexical(path: &str) -> PathBuf {
    Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
