use crate::utils::error::{BuildError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Component, Path};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BuildError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BuildError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Clean targets are deleted recursively, so they must stay inside the project root.
pub fn validate_relative_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;

    let candidate = Path::new(path);
    let escapes = candidate.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(BuildError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path must be relative to the project root and must not contain '..'"
                .to_string(),
        });
    }

    if candidate.components().all(|c| matches!(c, Component::CurDir)) {
        return Err(BuildError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path must not point at the project root itself".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        if let Some(extension) = Path::new(file).extension().and_then(|ext| ext.to_str()) {
            if !allowed_set.contains(extension) {
                return Err(BuildError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(BuildError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

/// Dotted Python module path, e.g. `MetaTrader5` or `sklearn.ensemble._forest`.
pub fn validate_module_name(field_name: &str, name: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").map_err(|e| {
        BuildError::ConfigError {
            message: format!("module name pattern: {}", e),
        }
    })?;

    if !re.is_match(name) {
        return Err(BuildError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Not a valid Python module name".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BuildError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_relative_path() {
        assert!(validate_relative_path("clean.directories", "build").is_ok());
        assert!(validate_relative_path("clean.directories", "out/dist").is_ok());
        assert!(validate_relative_path("clean.directories", "").is_err());
        assert!(validate_relative_path("clean.directories", "..").is_err());
        assert!(validate_relative_path("clean.directories", "build/../../etc").is_err());
        assert!(validate_relative_path("clean.directories", "/tmp/dist").is_err());
        assert!(validate_relative_path("clean.directories", ".").is_err());
    }

    #[test]
    fn test_validate_module_name() {
        assert!(validate_module_name("bundle.hidden_imports", "MetaTrader5").is_ok());
        assert!(validate_module_name("bundle.hidden_imports", "sklearn.ensemble._forest").is_ok());
        assert!(validate_module_name("bundle.hidden_imports", "").is_err());
        assert!(validate_module_name("bundle.hidden_imports", "9lives").is_err());
        assert!(validate_module_name("bundle.hidden_imports", "pkg..mod").is_err());
        assert!(validate_module_name("bundle.hidden_imports", "--onefile").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["main.py".to_string(), "gui.pyw".to_string()];
        assert!(validate_file_extensions("bundle.entry", &files, &["py", "pyw"]).is_ok());

        let invalid_files = vec!["main.exe".to_string()];
        assert!(validate_file_extensions("bundle.entry", &invalid_files, &["py", "pyw"]).is_err());

        let no_extension = vec!["main".to_string()];
        assert!(validate_file_extensions("bundle.entry", &no_extension, &["py"]).is_err());
    }
}
