use anyhow::{Context, Result};
use graphql_config::{find_config, load_config, TypegenConfig};
use std::path::{Path, PathBuf};

/// Loaded configuration and the directory its relative paths resolve against.
#[derive(Debug)]
pub struct CommandContext {
    pub config: TypegenConfig,
    pub base_dir: PathBuf,
}

impl CommandContext {
    /// Loads the config at `config_path`, or the one found by walking up from
    /// the current directory.
    ///
    /// Returns `None` only when no path was given and no config file exists.
    pub fn load(config_path: Option<&Path>) -> Result<Option<Self>> {
        let config_path = if let Some(path) = config_path {
            path.to_path_buf()
        } else {
            let current_dir = std::env::current_dir()?;
            match find_config(&current_dir).context("Failed to search for config")? {
                Some(path) => path,
                None => return Ok(None),
            }
        };

        let config = load_config(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?;

        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Some(Self { config, base_dir }))
    }

    /// Resolves a path from the config file against the config's directory.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// The loaded context, for commands that cannot run without a config.
    pub fn require<'a>(context: Option<&'a Self>, command_name: &str) -> Result<&'a Self> {
        context.with_context(|| {
            format!(
                "No typegen config file found. Create .typegen.yml or pass --config to `typegen {command_name}`."
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_explicit_config_and_resolve_paths() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join(".typegen.yml");
        fs::write(&config_path, "packages:\n  - name: alerts\n").unwrap();

        let context = CommandContext::load(Some(&config_path)).unwrap().unwrap();
        assert_eq!(context.base_dir, temp_dir.path());
        assert_eq!(
            context.resolve(Path::new("schema.json")),
            temp_dir.path().join("schema.json")
        );

        let absolute = temp_dir.path().join("elsewhere.json");
        assert_eq!(context.resolve(&absolute), absolute);
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = CommandContext::load(Some(&temp_dir.path().join("missing.yml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_require_reports_missing_config() {
        let error = CommandContext::require(None, "generate").unwrap_err();
        assert!(error.to_string().contains("typegen generate"));
    }
}
