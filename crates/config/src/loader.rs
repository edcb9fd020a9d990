use crate::{ConfigError, Result, TypegenConfig};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
const CONFIG_FILES: &[&str] = &[
    ".typegen.yml",
    ".typegen.yaml",
    ".typegen.json",
    "typegen.config.yml",
    "typegen.config.yaml",
    "typegen.config.json",
];

/// Find a typegen config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a typegen config from the specified path.
/// Automatically detects the format based on file extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<TypegenConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(
        packages = config.packages.len(),
        expansion = ?config.expansion,
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a typegen config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<TypegenConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    tracing::debug!(extension, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => parse_yaml(contents, path)?,
        "json" => parse_json(contents, path)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    tracing::debug!("Validating config");
    validate_config(&config, path)?;

    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<TypegenConfig> {
    serde_saphyr::from_str(contents).map_err(|e| invalid(path, format!("YAML parse error: {e}")))
}

fn parse_json(contents: &str, path: &Path) -> Result<TypegenConfig> {
    serde_json::from_str(contents).map_err(|e| invalid(path, format!("JSON parse error: {e}")))
}

fn invalid(path: &Path, message: String) -> ConfigError {
    ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    }
}

#[tracing::instrument(skip(config, path), fields(path = %path.display(), packages = config.packages.len()))]
fn validate_config(config: &TypegenConfig, path: &Path) -> Result<()> {
    if config.packages.is_empty() {
        return Err(invalid(path, "No packages configured".to_string()));
    }

    if config
        .endpoint
        .as_deref()
        .is_some_and(|endpoint| endpoint.trim().is_empty())
    {
        return Err(invalid(path, "Endpoint is empty".to_string()));
    }

    let mut package_names = HashSet::new();
    for package in &config.packages {
        tracing::trace!(package = %package.name, "Validating package config");

        if package.name.trim().is_empty() {
            return Err(invalid(path, "Package has an empty name".to_string()));
        }
        if !package_names.insert(package.name.as_str()) {
            return Err(invalid(
                path,
                format!("Package '{}' is defined more than once", package.name),
            ));
        }

        let mut type_names = HashSet::new();
        for name in package.type_names() {
            if name.trim().is_empty() {
                return Err(invalid(
                    path,
                    format!("Package '{}' has a type with an empty name", package.name),
                ));
            }
            if !type_names.insert(name) {
                return Err(invalid(
                    path,
                    format!("Package '{}' lists type '{name}' more than once", package.name),
                ));
            }
        }

        for (operation, endpoint) in package.operations() {
            if endpoint.name.trim().is_empty() {
                return Err(invalid(
                    path,
                    format!(
                        "Package '{}' has a {operation} with an empty name",
                        package.name
                    ),
                ));
            }
        }
    }

    Ok(())
}
