use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use cadence_maintenance::MaintenanceConfig;

use crate::state::ensure_cadence_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringSection,
    pub retention: RetentionSection,
    pub clock: ClockSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSection {
    /// Worth of one iteration before the difficulty multiplier.
    pub base_points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionSection {
    pub day_retention_days: u32,
    pub week_retention_weeks: u32,
    pub month_retention_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockSection {
    /// IANA timezone the engine's calendar days are anchored to.
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        let m = MaintenanceConfig::default();
        Self {
            scoring: ScoringSection {
                base_points: m.base_points,
            },
            retention: RetentionSection {
                day_retention_days: m.day_retention_days,
                week_retention_weeks: m.week_retention_weeks,
                month_retention_months: m.month_retention_months,
            },
            clock: ClockSection {
                timezone: "America/Chicago".to_string(),
            },
        }
    }
}

impl Config {
    pub fn maintenance(&self) -> MaintenanceConfig {
        MaintenanceConfig {
            base_points: self.scoring.base_points,
            day_retention_days: self.retention.day_retention_days,
            week_retention_weeks: self.retention.week_retention_weeks,
            month_retention_months: self.retention.month_retention_months,
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.clock
            .timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone: {}", self.clock.timezone))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_cadence_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
