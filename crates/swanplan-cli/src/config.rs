//! Configuration file management for swanplan.
//!
//! Provides a TOML-based config file at `~/.config/swanplan/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use swanplan_core::autopilot::engine::AutopilotConfig;
use swanplan_core::insight::InsightConfig;

/// Source savings are measured against when nothing else is configured.
pub const DEFAULT_BASELINE_SOURCE: &str = "Walmart";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub budget: BudgetSection,
    #[serde(default)]
    pub autopilot: AutopilotSection,
    #[serde(default)]
    pub insights: InsightSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BudgetSection {
    /// Source savings are measured against (e.g. "Walmart").
    pub baseline_source: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AutopilotSection {
    /// Largest portion correction, in percent, applied without approval.
    pub max_auto_adjust_pct: Option<f64>,
    /// Deviations smaller than this, in percent of target, are ignored.
    pub tolerance_pct: Option<f64>,
    /// Days of logged intake averaged when measuring deviation.
    pub deviation_window_days: Option<usize>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InsightSection {
    pub low_streak_days: Option<usize>,
    pub deviation_streak_days: Option<usize>,
    pub tolerance_pct: Option<f64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the swanplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/swanplan` or
/// `~/.config/swanplan`. We intentionally ignore the platform-specific
/// `dirs::config_dir()` (which returns `~/Library/Application Support` on
/// macOS).
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("swanplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("swanplan")
}

/// Return the path to the swanplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct SwanConfig {
    pub baseline_source: String,
    pub autopilot: AutopilotConfig,
    pub insights: InsightConfig,
}

impl SwanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config
    /// file > default.
    ///
    /// - Baseline source: `cli_baseline` > `SWANPLAN_BASELINE_SOURCE` env >
    ///   `config_file.budget.baseline_source` > `"Walmart"`.
    /// - Autopilot and insight thresholds: config file > crate defaults.
    pub fn resolve(cli_baseline: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let baseline_source = if let Some(source) = cli_baseline {
            source.to_string()
        } else if let Ok(source) = std::env::var("SWANPLAN_BASELINE_SOURCE") {
            source
        } else if let Some(source) = file_config
            .as_ref()
            .and_then(|cfg| cfg.budget.baseline_source.clone())
        {
            source
        } else {
            DEFAULT_BASELINE_SOURCE.to_string()
        };

        let mut autopilot = AutopilotConfig::default();
        let mut insights = InsightConfig::default();
        if let Some(cfg) = &file_config {
            if let Some(v) = cfg.autopilot.max_auto_adjust_pct {
                autopilot.max_auto_adjust_pct = v;
            }
            if let Some(v) = cfg.autopilot.tolerance_pct {
                autopilot.tolerance_pct = v;
            }
            if let Some(v) = cfg.autopilot.deviation_window_days {
                autopilot.deviation_window_days = v;
            }
            if let Some(v) = cfg.insights.low_streak_days {
                insights.low_streak_days = v;
            }
            if let Some(v) = cfg.insights.deviation_streak_days {
                insights.deviation_streak_days = v;
            }
            if let Some(v) = cfg.insights.tolerance_pct {
                insights.tolerance_pct = v;
            }
        }

        Ok(Self {
            baseline_source,
            autopilot,
            insights,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
