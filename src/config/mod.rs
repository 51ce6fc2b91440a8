#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::render::RenderOptions;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

/// Effective settings after merging defaults, the config file and the command line.
#[derive(Debug, Clone)]
pub struct Settings {
    pub backend_url: String,
    pub timeout_seconds: u64,
    pub render: RenderOptions,
    pub color: bool,
    pub log_json: bool,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            render: RenderOptions::default(),
            color: true,
            log_json: false,
            verbose: false,
        }
    }
}

impl Settings {
    /// Defaults overlaid with whatever the file sets.
    pub fn from_toml(file: &TomlConfig) -> Self {
        let mut settings = Self::default();
        if let Some(url) = &file.backend.url {
            settings.backend_url = url.clone();
        }
        if let Some(timeout) = file.backend.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(format) = file.render.format {
            settings.render.format = format;
        }
        if let Some(width) = file.render.width {
            settings.render.width = width;
        }
        if let Some(policy) = file.link_policy() {
            settings.render.link_policy = policy;
        }
        if let Some(color) = file.render.color {
            settings.color = color;
        }
        if let Some(json) = file.logging.json {
            settings.log_json = json;
        }
        if let Some(verbose) = file.logging.verbose {
            settings.verbose = verbose;
        }
        settings
    }

    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = TomlConfig::from_file(path)?;
        file.validate()?;
        Ok(Self::from_toml(&file))
    }
}

impl ConfigProvider for Settings {
    fn backend_url(&self) -> &str {
        &self.backend_url
    }

    fn timeout(&self) -> Option<Duration> {
        Some(Duration::from_secs(self.timeout_seconds))
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("backend_url", &self.backend_url)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 3600)?;
        validate_range("width", self.render.width, 20, 400)?;
        Ok(())
    }
}
