use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project settings read from `declscope.toml`. CLI flags win over these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeclscopeConfig {
    /// Language tag forced on every file, instead of guessing by extension
    pub language: Option<String>,
    pub jobs: Option<usize>,
    pub dump_nodes: Option<bool>,
    /// Extra gitignore-style patterns skipped when walking directories
    pub exclude: Vec<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("declscope.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<DeclscopeConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: DeclscopeConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &DeclscopeConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("declscope.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("declscope.toml");
        let config = DeclscopeConfig {
            language: Some("java".to_string()),
            jobs: Some(2),
            dump_nodes: Some(false),
            exclude: vec!["generated/".to_string()],
        };

        write_config(&path, &config, false).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), Some(config.clone()));

        assert!(write_config(&path, &config, false).is_err());
        assert!(write_config(&path, &DeclscopeConfig::default(), true).is_ok());
        assert_eq!(load_config(Some(&path)).unwrap(), Some(DeclscopeConfig::default()));
    }

    #[test]
    fn test_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("declscope.toml");
        std::fs::write(&path, "jobs = 3\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.jobs, Some(3));
        assert!(config.exclude.is_empty());
        assert_eq!(config.language, None);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("declscope.toml");
        std::fs::write(&path, "jobs = \"many\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("declscope.toml"));
    }
}
