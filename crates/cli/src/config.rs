use anyhow::{Context as AnyhowContext, Result};
use bangs_redirect::{ConfigError, Template, DEFAULT_SEARCH_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub(crate) const BIND_ENV: &str = "BANGS_BIND";
pub(crate) const INDEX_ENV: &str = "BANGS_INDEX";
pub(crate) const PAYLOAD_ENV: &str = "BANGS_PAYLOAD";
pub(crate) const DEFAULT_TEMPLATE_ENV: &str = "BANGS_DEFAULT_TEMPLATE";
pub(crate) const HOME_PAGE_ENV: &str = "BANGS_HOME_PAGE";

/// Service settings: defaults < TOML file < environment < CLI flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ServeConfig {
    /// Bind address, e.g. 127.0.0.1:8080
    pub bind: String,
    /// Compiled index file
    pub index: PathBuf,
    /// Compiled payload file
    pub payload: PathBuf,
    /// Template used when no bang matches; must contain `<q>`
    pub default_template: String,
    /// HTML served for empty queries (bundled page when unset)
    pub home_page: Option<PathBuf>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            index: PathBuf::from("bangs.idx"),
            payload: PathBuf::from("bangs.dat"),
            default_template: DEFAULT_SEARCH_TEMPLATE.to_string(),
            home_page: None,
        }
    }
}

/// Flag values that win over everything else when present.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConfigOverrides {
    pub bind: Option<String>,
    pub index: Option<PathBuf>,
    pub payload: Option<PathBuf>,
    pub default_template: Option<String>,
    pub home_page: Option<PathBuf>,
}

impl ServeConfig {
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the full layering for this process.
    pub(crate) fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(bind) = var(BIND_ENV) {
            self.bind = bind;
        }
        if let Some(index) = var(INDEX_ENV) {
            self.index = PathBuf::from(index);
        }
        if let Some(payload) = var(PAYLOAD_ENV) {
            self.payload = PathBuf::from(payload);
        }
        if let Some(template) = var(DEFAULT_TEMPLATE_ENV) {
            self.default_template = template;
        }
        if let Some(home) = var(HOME_PAGE_ENV) {
            self.home_page = Some(PathBuf::from(home));
        }
    }

    pub(crate) fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(bind) = &overrides.bind {
            self.bind = bind.clone();
        }
        if let Some(index) = &overrides.index {
            self.index = index.clone();
        }
        if let Some(payload) = &overrides.payload {
            self.payload = payload.clone();
        }
        if let Some(template) = &overrides.default_template {
            self.default_template = template.clone();
        }
        if let Some(home) = &overrides.home_page {
            self.home_page = Some(home.clone());
        }
    }

    pub(crate) fn default_template(&self) -> std::result::Result<Template, ConfigError> {
        Template::default_search(&self.default_template)
    }
}
