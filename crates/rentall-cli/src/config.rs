// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use rentall_app::{CarFilter, SortOption};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_STATUS_CLEAR_SECONDS: u64 = 4;
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_FILE_NAME: &str = "rentall.log";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
    pub seed_sample_data: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub default_filter: Option<String>,
    pub default_sort: Option<String>,
    pub status_clear_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("RENTALL_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set RENTALL_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(rentall_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and place values under [storage], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = {CONFIG_VERSION}",
                self.version,
                path.display()
            );
        }

        if let Some(db_path) = &self.storage.db_path {
            rentall_db::validate_db_path(db_path)?;
        }

        if let Some(filter) = &self.ui.default_filter
            && CarFilter::parse(filter).is_none()
        {
            bail!(
                "ui.default_filter in {} must be one of all, available, rented; got {filter:?}",
                path.display()
            );
        }

        if let Some(sort) = &self.ui.default_sort
            && SortOption::parse(sort).is_none()
        {
            bail!(
                "ui.default_sort in {} must be one of brand, year, daily_rate, rental_status; got {sort:?}",
                path.display()
            );
        }

        if self.ui.status_clear_seconds == Some(0) {
            bail!(
                "ui.status_clear_seconds in {} must be positive",
                path.display()
            );
        }

        if let Some(file) = &self.log.file
            && file.trim().is_empty()
        {
            bail!(
                "log.file in {} must not be empty; remove it to use the default",
                path.display()
            );
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => rentall_db::default_db_path(),
        }
    }

    pub fn seed_sample_data(&self) -> bool {
        self.storage.seed_sample_data.unwrap_or(true)
    }

    pub fn default_filter(&self) -> CarFilter {
        self.ui
            .default_filter
            .as_deref()
            .and_then(CarFilter::parse)
            .unwrap_or_default()
    }

    pub fn default_sort(&self) -> SortOption {
        self.ui
            .default_sort
            .as_deref()
            .and_then(SortOption::parse)
            .unwrap_or_default()
    }

    pub fn status_clear_after(&self) -> Duration {
        Duration::from_secs(
            self.ui
                .status_clear_seconds
                .unwrap_or(DEFAULT_STATUS_CLEAR_SECONDS),
        )
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(file) => Ok(PathBuf::from(file)),
            None => Ok(rentall_db::data_dir()?.join(LOG_FILE_NAME)),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# rentall config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/rentall/rentall.db)\n# db_path = \"/absolute/path/to/rentall.db\"\nseed_sample_data = true\n\n[ui]\ndefault_filter = \"all\"\ndefault_sort = \"brand\"\nstatus_clear_seconds = {}\n\n[log]\nlevel = \"{}\"\n# file = \"/absolute/path/to/rentall.log\"\n",
            path.display(),
            DEFAULT_STATUS_CLEAR_SECONDS,
            DEFAULT_LOG_LEVEL,
        )
    }
}
