//! Site configuration module.
//!
//! Handles loading and validating the optional `.treesite.toml` file
//! in the site root. Being a dotfile, the config is never published as a route.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional; defaults shown below
//!
//! theme_dir = "_theme"      # Template search directory (must be private)
//! output_dir = "_site"      # Static export target, relative to the root
//!
//! [serve]
//! host = "127.0.0.1"        # Dev server interface
//! port = 8080               # Dev server port
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [serve]
//! port = 3000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// File name of the per-site config, looked up in the site root.
pub const CONFIG_FILE: &str = ".treesite.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `.treesite.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding theme templates, relative to the root.
    pub theme_dir: String,
    /// Default static export target, relative to the root.
    pub output_dir: String,
    /// Development server settings.
    pub serve: ServeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            theme_dir: "_theme".to_string(),
            output_dir: "_site".to_string(),
            serve: ServeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let theme = Path::new(&self.theme_dir);
        if self.theme_dir.is_empty() || theme.is_absolute() {
            return Err(ConfigError::Validation(
                "theme_dir must be a relative path".into(),
            ));
        }
        if !first_component_is_private(theme) {
            return Err(ConfigError::Validation(
                "theme_dir must start with '_' so templates are never published".into(),
            ));
        }
        if self.output_dir.is_empty() {
            return Err(ConfigError::Validation("output_dir must not be empty".into()));
        }
        let output = Path::new(&self.output_dir);
        if output.is_relative()
            && !output.starts_with("..")
            && !first_component_is_private(output)
        {
            return Err(ConfigError::Validation(
                "output_dir inside the root must start with '_' or '.' so it is never published"
                    .into(),
            ));
        }
        if self.serve.host.is_empty() {
            return Err(ConfigError::Validation("serve.host must not be empty".into()));
        }
        if self.serve.port == 0 {
            return Err(ConfigError::Validation("serve.port must be non-zero".into()));
        }
        Ok(())
    }
}

fn first_component_is_private(path: &Path) -> bool {
    match path.components().next() {
        Some(Component::Normal(first)) => {
            let first = first.to_string_lossy();
            first.starts_with('_') || first.starts_with('.')
        }
        _ => false,
    }
}

/// Development server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// =============================================================================
// Config loading
// =============================================================================

/// Load the site config for `root`.
///
/// A missing `.treesite.toml` means stock defaults. Keys the file leaves out
/// fall back to their defaults; unknown keys are rejected and the result is
/// validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    let config = match fs::read_to_string(&config_path) {
        Ok(content) => parse_config(&content)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => SiteConfig::default(),
        Err(err) => return Err(err.into()),
    };
    config.validate()?;
    Ok(config)
}

/// Parse config text without validating it.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Returns a fully-commented stock `.treesite.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# treesite configuration
# ======================
# Save as .treesite.toml in the site root. All settings are optional;
# values shown below are the defaults. Unknown keys cause an error.

# Directory holding theme templates ({% extends "base.html" %} etc.),
# relative to the root. Must start with '_' so it is never published.
theme_dir = "_theme"

# Where `treesite build` writes the static export, relative to the root.
# Inside the root it must start with '_' or '.'; "../dist" is fine too.
output_dir = "_site"

# ---------------------------------------------------------------------------
# Development server
# ---------------------------------------------------------------------------
[serve]
host = "127.0.0.1"
port = 8080
"##
}
