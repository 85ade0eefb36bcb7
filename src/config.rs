//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/corix/corix.toml`
//! 3. Local config: `<dir>/.corix.toml`
//! 4. Environment variables: `CORIX_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{Taxonomy, LEAF_LEVEL};

/// Shallowest level the tree view can be cut at.
pub const MIN_DISPLAY_LEVEL: u32 = 2;

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub selection: Option<String>,
    pub max_level: Option<u32>,
    pub taxonomy_file: Option<PathBuf>,
}

/// Unified configuration for corix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// CSV score table (default: corix_scores.csv)
    pub data_file: PathBuf,
    /// Default `"{Application} - {Scenario}"` column
    pub selection: Option<String>,
    /// Deepest level shown by the tree view
    pub max_level: u32,
    /// TOML taxonomy replacing the built-in construct catalogue
    pub taxonomy_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("corix_scores.csv"),
            selection: None,
            max_level: LEAF_LEVEL,
            taxonomy_file: None,
        }
    }
}

/// Get the XDG config directory for corix.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "corix").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("corix.toml"))
}

/// Get the path to the local config file in a working directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".corix.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is kept as is.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
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
        self.data_file = expand_path(&self.data_file);
        self.taxonomy_file = self.taxonomy_file.as_deref().map(expand_path);
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            selection: overlay.selection.clone().or_else(|| self.selection.clone()),
            max_level: overlay.max_level.unwrap_or(self.max_level),
            taxonomy_file: overlay
                .taxonomy_file
                .clone()
                .or_else(|| self.taxonomy_file.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional working directory holding a `.corix.toml`
    ///
    /// Relative paths in a local config resolve against `local_dir`.
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&rebase(raw, dir));
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply CORIX_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("CORIX").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("selection") {
            settings.selection = Some(val);
        }
        match config.get_int("max_level") {
            Ok(val) => {
                settings.max_level = u32::try_from(val).map_err(|_| ApplicationError::Config {
                    message: format!("CORIX_MAX_LEVEL out of range: {val}"),
                })?;
            }
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(config_err(e)),
        }
        if let Ok(val) = config.get_string("taxonomy_file") {
            settings.taxonomy_file = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Reject values no command can work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if !(MIN_DISPLAY_LEVEL..=LEAF_LEVEL).contains(&self.max_level) {
            return Err(ApplicationError::Config {
                message: format!(
                    "max_level must lie in {}..={}, got {}",
                    MIN_DISPLAY_LEVEL, LEAF_LEVEL, self.max_level
                ),
            });
        }
        Ok(())
    }

    /// The configured taxonomy, or the built-in CoRIx catalogue.
    pub fn taxonomy(&self) -> Result<Taxonomy, ApplicationError> {
        match &self.taxonomy_file {
            Some(path) => load_taxonomy(path),
            None => Ok(Taxonomy::corix()),
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# corix configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/corix/corix.toml
#   Local:  <dir>/.corix.toml
#   Env:    CORIX_* environment variables

# CSV score table with Level, Construct and "{Application} - {Scenario}" columns
# data_file = "corix_scores.csv"

# Default application/scenario column
# selection = "Application A - Pathfinder"

# Deepest level shown by `corix tree` (2..=5)
# max_level = 5

# Custom construct taxonomy (root + [parents] table)
# taxonomy_file = "~/.config/corix/taxonomy.toml"
"#
        .to_string()
    }
}

/// Resolve relative paths of a local config against its directory.
fn rebase(mut raw: RawSettings, dir: &Path) -> RawSettings {
    let anchor = |p: PathBuf| if p.is_relative() { dir.join(p) } else { p };
    raw.data_file = raw.data_file.map(anchor);
    raw.taxonomy_file = raw.taxonomy_file.map(anchor);
    raw
}

/// Read and validate a TOML taxonomy file.
pub fn load_taxonomy(path: &Path) -> Result<Taxonomy, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read taxonomy {}: {}", path.display(), e),
    })?;
    let taxonomy: Taxonomy = toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse taxonomy {}: {}", path.display(), e),
    })?;
    taxonomy.validate()?;
    debug!("taxonomy {} with {} constructs", path.display(), taxonomy.len());
    Ok(taxonomy)
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_points_at_sample_file() {
        let settings = Settings::default();
        assert_eq!(settings.data_file, PathBuf::from("corix_scores.csv"));
        assert_eq!(settings.max_level, 5);
        assert!(settings.selection.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn given_partial_overlay_when_merge_then_keeps_unspecified_fields() {
        let base = Settings {
            selection: Some("A - X".into()),
            ..Settings::default()
        };
        let overlay = RawSettings {
            max_level: Some(3),
            ..RawSettings::default()
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.max_level, 3);
        assert_eq!(result.selection.as_deref(), Some("A - X"));
        assert_eq!(result.data_file, PathBuf::from("corix_scores.csv"));
    }

    #[test]
    fn given_max_level_out_of_range_when_validate_then_config_error() {
        for level in [0, 1, 6] {
            let settings = Settings {
                max_level: level,
                ..Settings::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(ApplicationError::Config { .. })
            ));
        }
    }

    #[test]
    fn given_tilde_in_data_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_file: PathBuf::from("~/scores.csv"),
            taxonomy_file: Some(PathBuf::from("$HOME/taxonomy.toml")),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.data_file.to_string_lossy().starts_with(&home));
        assert!(settings
            .taxonomy_file
            .as_ref()
            .is_some_and(|p| p.to_string_lossy().starts_with(&home)));
    }

    #[test]
    fn given_relative_local_paths_when_rebase_then_anchored_at_dir() {
        let raw = RawSettings {
            data_file: Some(PathBuf::from("data/scores.csv")),
            taxonomy_file: Some(PathBuf::from("/etc/taxonomy.toml")),
            ..RawSettings::default()
        };

        let rebased = rebase(raw, Path::new("/work"));

        assert_eq!(rebased.data_file, Some(PathBuf::from("/work/data/scores.csv")));
        assert_eq!(rebased.taxonomy_file, Some(PathBuf::from("/etc/taxonomy.toml")));
    }

    #[test]
    fn given_settings_when_to_toml_then_serializes_fields() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("data_file = \"corix_scores.csv\""));
        assert!(toml.contains("max_level = 5"));
    }
}
