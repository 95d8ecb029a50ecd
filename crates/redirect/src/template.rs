use crate::error::{ConfigError, Result};
use bangs_index::{has_placeholder, normalize_template, PLACEHOLDER, SENTINEL};

pub const DEFAULT_SEARCH_TEMPLATE: &str = "https://www.google.com/search?q=<q>";

/// A normalized redirect template: `<q>` already replaced by the sentinel byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    bytes: Vec<u8>,
}

impl Template {
    /// Template used when no bang matches. Must contain `<q>`.
    pub fn default_search(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConfigError::EmptyTemplate);
        }
        if !has_placeholder(text) {
            return Err(ConfigError::MissingPlaceholder {
                template: text.to_string(),
                placeholder: PLACEHOLDER,
            });
        }
        Ok(Self {
            bytes: normalize_template(text),
        })
    }

    /// Per-request fallback. Without a `<q>`, the query is appended.
    pub fn fallback(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConfigError::EmptyTemplate);
        }
        let mut bytes = normalize_template(text);
        if !has_placeholder(text) {
            bytes.push(SENTINEL);
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Template {
    fn default() -> Self {
        Self {
            bytes: normalize_template(DEFAULT_SEARCH_TEMPLATE),
        }
    }
}
