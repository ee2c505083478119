//! Tests for loading and building scene detection configurations
//!
//! These tests verify:
//! - JSON config files override only the fields they name
//! - Invalid files and invalid values are rejected
//! - The builder starts from file-loaded values

use scenecut_core::config::{
    DEFAULT_HISTOGRAM_WEIGHT, DEFAULT_SIMILARITY_WINDOW_SIZE, FrameAccess, SceneDetectionConfig,
    SceneDetectionConfigBuilder,
};
use scenecut_core::error::CoreError;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_file_parsing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config_path = dir.path().join("scenecut.json");
    fs::write(
        &config_path,
        r#"{
            "sigma": 2.5,
            "min_prominence": 1.5,
            "frame_access": "forward_walk",
            "max_scenes": 12
        }"#,
    )?;

    let config = SceneDetectionConfig::from_json_file(&config_path)?;

    assert_eq!(config.sigma, 2.5);
    assert_eq!(config.min_prominence, 1.5);
    assert_eq!(config.frame_access, FrameAccess::ForwardWalk);
    assert_eq!(config.max_scenes, Some(12));
    // Fields not in the file keep their defaults
    assert_eq!(config.histogram_weight, DEFAULT_HISTOGRAM_WEIGHT);
    assert_eq!(config.similarity_window_size, DEFAULT_SIMILARITY_WINDOW_SIZE);
    Ok(())
}

#[test]
fn test_config_file_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config_path = dir.path().join("saved.json");
    let original = SceneDetectionConfigBuilder::new()
        .sigma(1.25)
        .similarity_threshold(0.8)
        .max_scenes(5)
        .build()?;
    fs::write(&config_path, serde_json::to_string_pretty(&original)?)?;

    let loaded = SceneDetectionConfig::from_json_file(&config_path)?;
    assert_eq!(loaded, original);
    Ok(())
}

#[test]
fn test_malformed_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config_path = dir.path().join("broken.json");
    fs::write(&config_path, "{ \"sigma\": ")?;

    let result = SceneDetectionConfig::from_json_file(&config_path);
    assert!(matches!(result, Err(CoreError::JsonParse(_))));
    Ok(())
}

#[test]
fn test_invalid_values_in_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config_path = dir.path().join("invalid.json");
    fs::write(&config_path, r#"{ "similarity_window_size": 8 }"#)?;

    let result = SceneDetectionConfig::from_json_file(&config_path);
    assert!(matches!(result, Err(CoreError::Config(_))));
    Ok(())
}

#[test]
fn test_missing_config_file() {
    let result = SceneDetectionConfig::from_json_file(std::path::Path::new(
        "surely_this_config_does_not_exist.json",
    ));
    assert!(matches!(result, Err(CoreError::Io(_))));
}

#[test]
fn test_builder_from_loaded_config() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config_path = dir.path().join("base.json");
    fs::write(&config_path, r#"{ "sigma": 4.0 }"#)?;

    let base = SceneDetectionConfig::from_json_file(&config_path)?;
    let config = SceneDetectionConfigBuilder::from_config(base)
        .min_height(6.0)
        .build()?;

    assert_eq!(config.sigma, 4.0);
    assert_eq!(config.min_height, 6.0);
    Ok(())
}
