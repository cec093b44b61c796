use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default taskmon data directory: ~/.taskmon
pub fn get_taskmon_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".taskmon"))
}

/// Load configuration from an explicit file path.
pub fn load_from(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<AppConfig>(&s)?)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.taskmon/config.toml (highest)
    let taskmon_dir = get_taskmon_data_dir()?;
    let taskmon_config = taskmon_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg: AppConfig = if taskmon_config.exists() {
        load_from(&taskmon_config)?
    } else if local_config.exists() {
        load_from(local_config)?
    } else {
        AppConfig::default()
    };

    // Update logging directory to use taskmon data directory if not set
    if cfg
        .logging
        .directory
        .as_deref()
        .map(str::trim)
        .map_or(true, str::is_empty)
    {
        let logs_dir = taskmon_dir.join("logs");
        std::fs::create_dir_all(&logs_dir)?;
        cfg.logging.directory = Some(logs_dir.to_string_lossy().to_string());
    }

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_reads_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[visual]\ntimeline_cap = 10\n").unwrap();

        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.visual.timeline_cap, 10);
        assert_eq!(cfg.visual.tick_interval_ms, 50);
    }

    #[test]
    fn load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "visual = \"not a table\"").unwrap();

        assert!(load_from(&path).is_err());
    }
}
