use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub visual: VisualConfig,

    #[serde(default)]
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "taskmon_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    false
}

fn default_logging_file() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Knobs of the simulated execution: tick cadence, lifecycle delays, and the
/// bounds of the randomized durations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualConfig {
    /// Period of the per-thread progress tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// How long a completed thread stays on screen before removal starts.
    #[serde(default = "default_linger_ms")]
    pub linger_ms: u64,

    /// Fade-out delay between removal starting and the record being deleted.
    #[serde(default = "default_remove_fade_ms")]
    pub remove_fade_ms: u64,

    /// Maximum number of timeline entries kept; oldest evicted first.
    #[serde(default = "default_timeline_cap")]
    pub timeline_cap: usize,

    /// Offset between thread starts in a parallel batch.
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,

    /// Randomized duration bounds for a single thread, [min, max).
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,

    /// Randomized duration bounds for threads in the demo batch, [min, max).
    #[serde(default = "default_batch_min_duration_ms")]
    pub batch_min_duration_ms: u64,

    #[serde(default = "default_batch_max_duration_ms")]
    pub batch_max_duration_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_linger_ms() -> u64 {
    2000
}

fn default_remove_fade_ms() -> u64 {
    300
}

fn default_timeline_cap() -> usize {
    50
}

fn default_stagger_ms() -> u64 {
    100
}

fn default_min_duration_ms() -> u64 {
    2000
}

fn default_max_duration_ms() -> u64 {
    7000
}

fn default_batch_min_duration_ms() -> u64 {
    1000
}

fn default_batch_max_duration_ms() -> u64 {
    5000
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            linger_ms: default_linger_ms(),
            remove_fade_ms: default_remove_fade_ms(),
            timeline_cap: default_timeline_cap(),
            stagger_ms: default_stagger_ms(),
            min_duration_ms: default_min_duration_ms(),
            max_duration_ms: default_max_duration_ms(),
            batch_min_duration_ms: default_batch_min_duration_ms(),
            batch_max_duration_ms: default_batch_max_duration_ms(),
        }
    }
}

impl VisualConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }

    pub fn remove_fade(&self) -> Duration {
        Duration::from_millis(self.remove_fade_ms)
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Redraw cadence of the dashboard.
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,

    #[serde(default = "default_show_splash")]
    pub show_splash: bool,

    #[serde(default = "default_splash_duration_ms")]
    pub splash_duration_ms: u64,
}

fn default_update_interval_ms() -> u64 {
    80
}

fn default_show_splash() -> bool {
    true
}

fn default_splash_duration_ms() -> u64 {
    1200
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: default_update_interval_ms(),
            show_splash: default_show_splash(),
            splash_duration_ms: default_splash_duration_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_simulation_constants() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.visual.tick_interval_ms, 50);
        assert_eq!(cfg.visual.linger_ms, 2000);
        assert_eq!(cfg.visual.remove_fade_ms, 300);
        assert_eq!(cfg.visual.timeline_cap, 50);
        assert_eq!(cfg.visual.stagger_ms, 100);
        assert_eq!(cfg.visual.min_duration_ms, 2000);
        assert_eq!(cfg.visual.max_duration_ms, 7000);
        assert_eq!(cfg.visual.batch_min_duration_ms, 1000);
        assert_eq!(cfg.visual.batch_max_duration_ms, 5000);
        assert!(cfg.logging.enabled);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [visual]
            linger_ms = 500

            [tui]
            show_splash = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.visual.linger_ms, 500);
        assert_eq!(cfg.visual.tick_interval_ms, 50);
        assert!(!cfg.tui.show_splash);
        assert_eq!(cfg.tui.update_interval_ms, 80);
    }

    #[test]
    fn tick_interval_never_zero() {
        let cfg = VisualConfig {
            tick_interval_ms: 0,
            ..VisualConfig::default()
        };
        assert_eq!(cfg.tick_interval(), Duration::from_millis(1));
    }
}
