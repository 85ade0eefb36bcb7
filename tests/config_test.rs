//! Tests for layered settings and taxonomy files

use std::path::PathBuf;
use std::sync::Arc;

use corix::application::ApplicationError;
use corix::config::{load_taxonomy, local_config_path, Settings};
use corix::domain::{DomainError, TreeBuilder};
use corix::infrastructure::di::ServiceContainer;
use corix::infrastructure::traits::RealFileSystem;
use tempfile::TempDir;

fn write(temp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp.path().join(name);
    std::fs::write(&path, content).expect("write file");
    path
}

#[test]
fn given_local_config_when_loading_then_overrides_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    write(
        &temp,
        ".corix.toml",
        "data_file = \"data/scores.csv\"\nselection = \"Application B - TV Spoilers\"\nmax_level = 3\n",
    );

    // Act
    let settings = Settings::load(Some(temp.path())).unwrap();

    // Assert
    assert_eq!(settings.data_file, temp.path().join("data/scores.csv"));
    assert_eq!(settings.selection.as_deref(), Some("Application B - TV Spoilers"));
    assert_eq!(settings.max_level, 3);
}

#[test]
fn given_out_of_range_max_level_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();
    write(&temp, ".corix.toml", "max_level = 7\n");

    let result = Settings::load(Some(temp.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_malformed_local_config_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();
    write(&temp, ".corix.toml", "max_level = \"deep\"\n");

    let result = Settings::load(Some(temp.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_dir_when_local_config_path_then_dot_file_inside() {
    let path = local_config_path(std::path::Path::new("/work"));
    assert_eq!(path, PathBuf::from("/work/.corix.toml"));
}

#[test]
fn given_taxonomy_file_when_loading_then_builder_uses_it() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "taxonomy.toml",
        r#"root = "Top"

[parents]
"Layer" = "Top"
"Item" = "Layer"
"#,
    );
    let table = corix::domain::ScoreTable::from_csv(
        "Level,Construct,X - Y\n2,Top,\n3,Layer,\n5,Item,6\n",
    )
    .unwrap();

    // Act
    let taxonomy = load_taxonomy(&path).unwrap();
    let tree = TreeBuilder::new(Arc::new(taxonomy)).build(&table, "X", "Y").unwrap();

    // Assert
    assert_eq!(tree.score("Layer"), Some(6.0));
    assert_eq!(tree.score("Top"), Some(6.0));
}

#[test]
fn given_cyclic_taxonomy_file_when_loading_then_cyclic_structure() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "taxonomy.toml",
        "root = \"Top\"\n[parents]\n\"A\" = \"B\"\n\"B\" = \"A\"\n",
    );

    let result = load_taxonomy(&path);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::CyclicStructure(_)))
    ));
}

#[test]
fn given_missing_taxonomy_file_when_building_container_then_config_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let settings = Settings {
        taxonomy_file: Some(temp.path().join("absent.toml")),
        ..Settings::default()
    };

    // Act
    let result = ServiceContainer::with_deps(settings, Arc::new(RealFileSystem));

    // Assert
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_default_settings_when_building_container_then_uses_builtin_taxonomy() {
    let container = ServiceContainer::with_deps(Settings::default(), Arc::new(RealFileSystem)).unwrap();

    assert_eq!(container.corix.builder().taxonomy().len(), 45);
}
