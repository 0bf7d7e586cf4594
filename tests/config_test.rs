//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global → Local: scalar values REPLACE
//! - Translations: key-wise UNION, later layer wins per key
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;

use tempfile::TempDir;

use cmstree::application::ApplicationError;
use cmstree::config::{local_config_path, CacheBackend, Settings};

#[test]
fn given_no_local_config_when_load_then_defaults() {
    // Arrange
    let project = TempDir::new().unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.base_type, "SiteTree");
    assert_eq!(settings.resources_url, "/_resources");
    assert_eq!(settings.edit_link, "admin/pages/edit/show/{id}");
}

#[test]
fn given_local_config_when_load_then_overrides_scalars() {
    // Arrange
    let project = TempDir::new().unwrap();
    let local = r#"
base_type = "Page"
cache_backend = "memory"
resources_url = "/assets"
num_children_method = "numHistoricalChildren"
"#;
    fs::write(local_config_path(project.path()), local).unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.base_type, "Page");
    assert_eq!(settings.cache_backend, CacheBackend::Memory);
    assert_eq!(settings.resources_url, "/assets");
    assert_eq!(settings.num_children_method, "numHistoricalChildren");
    // untouched values keep their defaults
    assert_eq!(settings.edit_link, "admin/pages/edit/show/{id}");
}

#[test]
fn given_local_translations_when_load_then_available_in_settings() {
    let project = TempDir::new().unwrap();
    let local = r#"
[translations]
"LeftAndMain.PAGETYPE" = "Seitentyp"
"#;
    fs::write(local_config_path(project.path()), local).unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(
        settings
            .translations
            .get("LeftAndMain.PAGETYPE")
            .map(String::as_str),
        Some("Seitentyp")
    );
}

#[test]
fn given_tilde_in_cache_dir_when_load_then_expanded() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "cache_dir = \"~/cmstree-cache\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert!(!settings.cache_dir.to_string_lossy().starts_with('~'));
    assert!(settings.cache_dir.ends_with("cmstree-cache"));
}

#[test]
fn given_invalid_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(
        local_config_path(project.path()),
        "cache_backend = \"redis\"\n",
    )
    .unwrap();

    let result = Settings::load(Some(project.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_settings_when_to_toml_then_loadable_as_local_config() {
    // Arrange
    let project = TempDir::new().unwrap();
    let mut original = Settings::default();
    original.base_type = "Page".into();
    original.cache_dir = project.path().join("cache");
    original
        .translations
        .insert("LeftAndMain.PAGETYPE".into(), "Type".into());

    // Act
    fs::write(local_config_path(project.path()), original.to_toml().unwrap()).unwrap();
    let loaded = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(loaded.base_type, "Page");
    assert_eq!(loaded.cache_dir, project.path().join("cache"));
    assert_eq!(loaded.translations, original.translations);
}

#[test]
fn given_template_when_parsed_then_is_valid_toml() {
    let project = TempDir::new().unwrap();
    fs::write(local_config_path(project.path()), Settings::template()).unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.base_type, "SiteTree");
}
