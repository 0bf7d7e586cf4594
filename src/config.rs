//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cmstree/cmstree.toml`
//! 3. Local config: `<project_dir>/.cmstree.toml`
//! 4. Environment variables: `CMSTREE_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::NUM_CHILDREN;

/// Where cache regions live.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// One directory per region below `cache_dir`
    #[default]
    File,
    /// Process memory; gone when the process exits
    Memory,
}

/// Raw settings for intermediate parsing (all optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_type: Option<String>,
    pub cache_backend: Option<CacheBackend>,
    pub cache_dir: Option<PathBuf>,
    pub resources_url: Option<String>,
    pub resources_dir: Option<PathBuf>,
    pub num_children_method: Option<String>,
    pub edit_link: Option<String>,
    pub translations: Option<BTreeMap<String, String>>,
}

/// Unified configuration for cmstree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the page type hierarchy (default: SiteTree)
    pub base_type: String,
    /// Cache backend (default: file)
    pub cache_backend: CacheBackend,
    /// Root directory for file-backed cache regions
    pub cache_dir: PathBuf,
    /// URL prefix for relative icon resources
    pub resources_url: String,
    /// Directory relative icon resources must exist in (unchecked when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources_dir: Option<PathBuf>,
    /// Default child count strategy for tree classes
    pub num_children_method: String,
    /// Edit link pattern for tree nodes, `{id}` is replaced by the page id
    pub edit_link: String,
    /// Translation table
    pub translations: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_type: "SiteTree".into(),
            cache_backend: CacheBackend::default(),
            cache_dir: dirs_default_cache_dir(),
            resources_url: "/_resources".into(),
            resources_dir: None,
            num_children_method: NUM_CHILDREN.into(),
            edit_link: "admin/pages/edit/show/{id}".into(),
            translations: BTreeMap::new(),
        }
    }
}

/// Get the default cache directory.
fn dirs_default_cache_dir() -> PathBuf {
    ProjectDirs::from("", "", "cmstree")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.cache/cmstree"))
}

/// Get the XDG config directory for cmstree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cmstree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cmstree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".cmstree.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; unexpandable input is returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.cache_dir.to_string_lossy().as_ref());
        self.cache_dir = PathBuf::from(expanded);

        if let Some(dir) = &self.resources_dir {
            self.resources_dir = Some(PathBuf::from(expand_env_vars(
                dir.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Merge overlay config onto self (base).
    ///
    /// - Scalar options: overlay wins if Some, otherwise keep base
    /// - Translations: key-wise union, overlay wins per key
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut translations = self.translations.clone();
        if let Some(extra) = &overlay.translations {
            translations.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Self {
            base_type: overlay
                .base_type
                .clone()
                .unwrap_or_else(|| self.base_type.clone()),
            cache_backend: overlay.cache_backend.unwrap_or(self.cache_backend),
            cache_dir: overlay
                .cache_dir
                .clone()
                .unwrap_or_else(|| self.cache_dir.clone()),
            resources_url: overlay
                .resources_url
                .clone()
                .unwrap_or_else(|| self.resources_url.clone()),
            resources_dir: overlay
                .resources_dir
                .clone()
                .or_else(|| self.resources_dir.clone()),
            num_children_method: overlay
                .num_children_method
                .clone()
                .unwrap_or_else(|| self.num_children_method.clone()),
            edit_link: overlay
                .edit_link
                .clone()
                .unwrap_or_else(|| self.edit_link.clone()),
            translations,
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/cmstree/cmstree.toml`
    /// 3. Local config: `<project_dir>/.cmstree.toml`
    /// 4. Environment variables: `CMSTREE_*` prefix
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Project-local config
        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply CMSTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CMSTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("base_type") {
            settings.base_type = val;
        }
        if let Ok(val) = config.get::<CacheBackend>("cache_backend") {
            settings.cache_backend = val;
        }
        if let Ok(val) = config.get_string("cache_dir") {
            settings.cache_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("resources_url") {
            settings.resources_url = val;
        }
        if let Ok(val) = config.get_string("resources_dir") {
            settings.resources_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("num_children_method") {
            settings.num_children_method = val;
        }
        if let Ok(val) = config.get_string("edit_link") {
            settings.edit_link = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cmstree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cmstree/cmstree.toml
#   Local:  <project_dir>/.cmstree.toml
#   Env:    CMSTREE_* environment variables

# Root of the page type hierarchy
# base_type = "SiteTree"

# Cache backend: "file" or "memory"
# cache_backend = "file"
# cache_dir = "~/.cache/cmstree"

# URL prefix for relative icon paths, and where those files live
# resources_url = "/_resources"
# resources_dir = "./public/_resources"

# Child count strategy: "numChildren" or "numHistoricalChildren"
# num_children_method = "numChildren"

# Edit link for tree nodes
# edit_link = "admin/pages/edit/show/{id}"

[translations]
# "LeftAndMain.PAGETYPE" = "Page type"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
