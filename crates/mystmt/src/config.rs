//! Per-statement rendering settings.
//!
//! Every statement owns a [`StmtConfig`]. Defaults follow the usual MySQL driver conventions:
//! `?` placeholders, backtick-quoted column references and no quoting of inline values.
//!
//! A config can also be read from TOML, where every key is optional:
//!
//! ```toml
//! placeholder = "%s"        # or `false` to inline every value
//! quote_all_values = true
//! quote_all_col_refs = true
//! select_cacheable = false  # emit SQL_NO_CACHE on every SELECT
//! ```

use crate::error::{StmtError, StmtResult};
use serde::Deserialize;
use std::path::Path;

/// Placeholder token used when none is configured explicitly.
pub const DEFAULT_PLACEHOLDER: &str = "?";

/// Settings consumed by value parameterization and identifier quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StmtConfig {
    /// Placeholder token for bound values; `None` inlines every value.
    pub placeholder: Option<String>,
    /// Single-quote parameterizable values that end up inline.
    pub quote_all_values: bool,
    /// Wrap column references in backticks.
    pub quote_all_col_refs: bool,
    /// Default for SELECT `SQL_CACHE` / `SQL_NO_CACHE`.
    pub select_cacheable: Option<bool>,
}

impl Default for StmtConfig {
    fn default() -> Self {
        Self {
            placeholder: Some(DEFAULT_PLACEHOLDER.to_string()),
            quote_all_values: false,
            quote_all_col_refs: true,
            select_cacheable: None,
        }
    }
}

impl StmtConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `token` as placeholder. An empty token falls back to the default one.
    pub fn with_placeholder(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.placeholder = Some(if token.is_empty() {
            DEFAULT_PLACEHOLDER.to_string()
        } else {
            token
        });
        self
    }

    /// Disable parameterization; all values are rendered inline.
    pub fn without_placeholder(mut self) -> Self {
        self.placeholder = None;
        self
    }

    /// Quote inline values that would otherwise be parameterized.
    pub fn with_quote_all_values(mut self, enabled: bool) -> Self {
        self.quote_all_values = enabled;
        self
    }

    /// Quote column references with backticks.
    pub fn with_quote_all_col_refs(mut self, enabled: bool) -> Self {
        self.quote_all_col_refs = enabled;
        self
    }

    /// Set the default SELECT cache hint.
    pub fn with_select_cacheable(mut self, cacheable: Option<bool>) -> Self {
        self.select_cacheable = cacheable;
        self
    }

    /// The active placeholder token, if parameterization is enabled.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> StmtResult<Self> {
        let file: ConfigFile = toml::from_str(raw)?;
        Ok(file.into_config())
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> StmtResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StmtError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw).map_err(|e| {
            StmtError::config(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e.message()
            ))
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    placeholder: Option<PlaceholderSetting>,
    quote_all_values: Option<bool>,
    quote_all_col_refs: Option<bool>,
    select_cacheable: Option<bool>,
}

/// `placeholder = "?"` or `placeholder = false`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlaceholderSetting {
    Enabled(bool),
    Token(String),
}

impl ConfigFile {
    fn into_config(self) -> StmtConfig {
        let mut config = StmtConfig::default();
        match self.placeholder {
            Some(PlaceholderSetting::Enabled(false)) => config = config.without_placeholder(),
            Some(PlaceholderSetting::Token(token)) => config = config.with_placeholder(token),
            Some(PlaceholderSetting::Enabled(true)) | None => {}
        }
        if let Some(v) = self.quote_all_values {
            config.quote_all_values = v;
        }
        if let Some(v) = self.quote_all_col_refs {
            config.quote_all_col_refs = v;
        }
        config.select_cacheable = self.select_cacheable;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = StmtConfig::default();
        assert_eq!(config.placeholder(), Some("?"));
        assert!(!config.quote_all_values);
        assert!(config.quote_all_col_refs);
        assert_eq!(config.select_cacheable, None);
    }

    #[test]
    fn empty_token_falls_back_to_default() {
        let config = StmtConfig::new().without_placeholder().with_placeholder("");
        assert_eq!(config.placeholder(), Some("?"));
    }

    #[test]
    fn toml_overrides() {
        let config = StmtConfig::from_toml_str(
            r#"
placeholder = "%s"
quote_all_values = true
select_cacheable = false
"#,
        )
        .unwrap();
        assert_eq!(config.placeholder(), Some("%s"));
        assert!(config.quote_all_values);
        assert!(config.quote_all_col_refs);
        assert_eq!(config.select_cacheable, Some(false));
    }

    #[test]
    fn toml_placeholder_toggle() {
        let off = StmtConfig::from_toml_str("placeholder = false").unwrap();
        assert_eq!(off.placeholder(), None);

        let on = StmtConfig::from_toml_str("placeholder = true").unwrap();
        assert_eq!(on.placeholder(), Some("?"));
    }

    #[test]
    fn toml_empty_is_default() {
        assert_eq!(StmtConfig::from_toml_str("").unwrap(), StmtConfig::default());
    }

    #[test]
    fn toml_unknown_key_is_config_error() {
        let err = StmtConfig::from_toml_str("placeholders = 1").unwrap_err();
        assert!(matches!(err, StmtError::Config(_)));
    }

    #[test]
    fn load_missing_file() {
        let err = StmtConfig::load("/nonexistent/mystmt.toml").unwrap_err();
        assert!(err.message().contains("failed to read config file"));
    }
}
