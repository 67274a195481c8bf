//! Config file read/write with atomic backup rotation.

use crate::schema::MindGaugeConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Number of rolling backups to keep.
const MAX_BACKUPS: usize = 3;

/// Resolve the MindGauge config directory.
/// Priority: `MINDGAUGE_CONFIG_DIR` env > `~/.mindgauge/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MINDGAUGE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".mindgauge");
    }
    PathBuf::from(".mindgauge")
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<MindGaugeConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(MindGaugeConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: MindGaugeConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Write config to disk atomically (write to temp file, rename).
///
/// Creates a rolling backup of the previous config before overwriting.
pub async fn write_config(config: &MindGaugeConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    if path.exists() {
        rotate_backups(path).await;
    }

    let yaml =
        serde_yaml::to_string(config).with_context(|| "Failed to serialize config to YAML")?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to rename temp config to: {}", path.display()))?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}

/// Rotate backup files: config.yaml.bak.1 → .bak.2 → ... → .bak.N
async fn rotate_backups(path: &Path) {
    for i in (1..MAX_BACKUPS).rev() {
        let old = path.with_extension(format!("yaml.bak.{}", i));
        let new = path.with_extension(format!("yaml.bak.{}", i + 1));
        if old.exists() {
            if let Err(e) = fs::rename(&old, &new).await {
                warn!("Failed to rotate backup {}: {}", old.display(), e);
            }
        }
    }

    let bak = path.with_extension("yaml.bak.1");
    if let Err(e) = fs::copy(path, &bak).await {
        warn!("Failed to create backup {}: {}", bak.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let cfg = load_config(Path::new("/nonexistent/mindgauge/config.yaml"))
            .await
            .unwrap();
        assert!(cfg.providers.is_none());
    }

    #[tokio::test]
    async fn write_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!("mindgauge-cfg-{}", std::process::id()));
        let path = config_file_path(&dir);

        let mut cfg = MindGaugeConfig::default();
        cfg.ocr = Some(crate::schema::OcrConfig {
            engine: Some("vision".to_string()),
            tesseract_command: None,
        });
        write_config(&cfg, &path).await.unwrap();

        let loaded = load_config(&path).await.unwrap();
        assert_eq!(loaded.ocr.unwrap().engine.as_deref(), Some("vision"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
