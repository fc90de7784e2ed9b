use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
}

/// Connection settings for the snapshot (historical data) service.
#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Connection settings for the title/episode metadata service.
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataConfig {
    #[serde(default = "default_metadata_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_snapshot_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_metadata_base_url() -> String {
    "https://api.imdbapi.dev".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            base_url: default_snapshot_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: default_metadata_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.snapshot.base_url.trim().is_empty() {
        anyhow::bail!("snapshot.base_url must not be empty");
    }
    if config.metadata.base_url.trim().is_empty() {
        anyhow::bail!("metadata.base_url must not be empty");
    }
    if config.snapshot.timeout_secs == 0 || config.metadata.timeout_secs == 0 {
        anyhow::bail!("timeout_secs must be > 0");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.snapshot.base_url, "http://localhost:8000");
        assert_eq!(config.metadata.base_url, "https://api.imdbapi.dev");
        assert_eq!(config.snapshot.timeout_secs, 30);
    }

    #[test]
    fn test_partial_config_overrides() {
        let config: Config = toml::from_str(
            r#"
[snapshot]
base_url = "http://warp.example:9000"
timeout_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(config.snapshot.base_url, "http://warp.example:9000");
        assert_eq!(config.snapshot.timeout_secs, 5);
        assert_eq!(config.metadata.base_url, "https://api.imdbapi.dev");
    }
}
