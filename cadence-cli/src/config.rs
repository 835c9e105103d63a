use anyhow::{Context, Result, bail};
use cadence_core::ScoringPolicy;
use cadence_core::time::parse_timezone;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_cadence_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralSection,
    #[serde(default)]
    pub scoring: ScoringPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSection {
    /// IANA timezone used for local period boundaries.
    pub timezone: String,
    /// Default tracing filter when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.general.timezone)
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_cadence_home()?.join("config.toml"))
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).context("parse config.toml")?;
    if let Err(e) = cfg.scoring.validate() {
        bail!("{}: {e}", p.display());
    }
    Ok(cfg)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
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
