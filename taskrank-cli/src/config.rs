use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use taskrank_core::{Analyzer, DEFAULT_SUGGEST_LIMIT, StrategyKind, StrategyTable, UrgencyScale};

use crate::state::ensure_taskrank_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringSection,
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    /// IANA zone that decides what "today" is.
    pub timezone: String,
    /// Used by the CLI when neither `--strategy` nor the batch names one.
    pub default_strategy: String,
    pub suggest_limit: usize,
    pub urgency: UrgencyScale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            default_strategy: StrategyKind::SmartBalance.key().to_string(),
            suggest_limit: DEFAULT_SUGGEST_LIMIT,
            urgency: UrgencyScale::default(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.timezone()?;
        self.scoring.urgency.validate()?;
        if StrategyKind::from_key(&self.scoring.default_strategy).is_none() {
            bail!(
                "unknown default_strategy '{}' (expected one of: {})",
                self.scoring.default_strategy,
                StrategyKind::ALL.map(|k| k.key()).join(", ")
            );
        }
        if self.scoring.suggest_limit == 0 {
            bail!("suggest_limit must be at least 1");
        }
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        Ok(taskrank_core::time::parse_timezone(&self.scoring.timezone)?)
    }

    pub fn default_strategy(&self) -> StrategyKind {
        StrategyKind::resolve(Some(&self.scoring.default_strategy))
    }

    /// Analyzer built from the configured urgency scale.
    pub fn analyzer(&self) -> Result<Analyzer> {
        Ok(Analyzer::new(
            StrategyTable::standard(),
            self.scoring.urgency,
        )?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_taskrank_home()?.join("config.toml"))
}

/// Load from `path`, or the default location. A missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        if path.is_some() {
            bail!("config not found: {}", p.display());
        }
        return Ok(Config::default());
    }

    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", p.display()))?;
    tracing::debug!(path = %p.display(), "loaded config");
    Ok(cfg)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write the default config to `path`. Returns `None` when a file is
/// already there and `force` is off.
pub fn init_config(path: &Path, force: bool) -> Result<Option<PathBuf>> {
    if path.exists() && !force {
        return Ok(None);
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    save_config(&Config::default(), path)?;
    tracing::info!(path = %path.display(), force, "wrote default config");
    Ok(Some(path.to_path_buf()))
}
