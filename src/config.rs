//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tapmath/tapmath.toml`
//! 3. Data directory given on the command line (`-C`)
//! 4. Local config: `<data_dir>/.tapmath.toml`
//! 5. Environment variables: `TAPMATH_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::policy::{DEFAULT_BRANCHES_THRESHOLD, DEFAULT_TRUNK_THRESHOLD};
use crate::domain::{LayoutEngine, LayoutStrategy, Progression, ProgressionPolicy};

/// Unlock thresholds and optional overrides of the catalog's switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProgressionSettings {
    /// Completed roots needed to open the trunk
    pub trunk_threshold: usize,
    /// Completed trunk concepts needed to open the branches
    pub branches_threshold: usize,
    /// Overrides `progression.unlockSystem` of the tree structure
    pub unlock_system: Option<bool>,
    /// Overrides `progression.prerequisiteCheck` of the tree structure
    pub prerequisite_check: Option<bool>,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            trunk_threshold: DEFAULT_TRUNK_THRESHOLD,
            branches_threshold: DEFAULT_BRANCHES_THRESHOLD,
            unlock_system: None,
            prerequisite_check: None,
        }
    }
}

impl ProgressionSettings {
    /// Combine the catalog's switches with these settings.
    pub fn policy(&self, progression: Progression) -> ProgressionPolicy {
        let mut policy = ProgressionPolicy::from_progression(progression)
            .with_thresholds(self.trunk_threshold, self.branches_threshold);
        if let Some(enabled) = self.unlock_system {
            policy.unlock_system_enabled = enabled;
        }
        if let Some(enabled) = self.prerequisite_check {
            policy.prerequisite_check_enabled = enabled;
        }
        policy
    }
}

/// Node placement settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LayoutSettings {
    pub strategy: LayoutStrategy,
    /// Seed for the parametric strategy's jitter
    pub seed: u64,
}

impl LayoutSettings {
    pub fn engine(&self) -> LayoutEngine {
        LayoutEngine::new(self.strategy, self.seed)
    }
}

/// Raw progression settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawProgressionSettings {
    pub trunk_threshold: Option<usize>,
    pub branches_threshold: Option<usize>,
    pub unlock_system: Option<bool>,
    pub prerequisite_check: Option<bool>,
}

/// Raw layout settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub strategy: Option<LayoutStrategy>,
    pub seed: Option<u64>,
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub structure_file: Option<String>,
    pub concepts_file: Option<String>,
    pub progress_file: Option<PathBuf>,
    pub progression: RawProgressionSettings,
    pub layout: RawLayoutSettings,
}

/// Unified configuration for tapmath.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the catalog documents (default: cwd)
    pub data_dir: PathBuf,
    /// Tree structure document, relative to `data_dir`
    pub structure_file: String,
    /// Concepts document, relative to `data_dir`
    pub concepts_file: String,
    /// Saved progress record
    pub progress_file: PathBuf,
    pub progression: ProgressionSettings,
    pub layout: LayoutSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            structure_file: "tree-structure.json".into(),
            concepts_file: "math-concepts.json".into(),
            progress_file: default_progress_file(),
            progression: ProgressionSettings::default(),
            layout: LayoutSettings::default(),
        }
    }
}

/// Get the default progress record location.
fn default_progress_file() -> PathBuf {
    ProjectDirs::from("", "", "tapmath")
        .map(|dirs| dirs.data_local_dir().join("tapmath-progress.json"))
        .unwrap_or_else(|| PathBuf::from("~/.tapmath/tapmath-progress.json"))
}

/// Get the XDG config directory for tapmath.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tapmath").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tapmath.toml"))
}

/// Get the path to the local config file in a data directory.
pub fn local_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".tapmath.toml")
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
    pub fn structure_path(&self) -> PathBuf {
        self.data_dir.join(&self.structure_file)
    }

    pub fn concepts_path(&self) -> PathBuf {
        self.data_dir.join(&self.concepts_file)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_dir = PathBuf::from(expand_env_vars(&self.data_dir.to_string_lossy()));
        self.progress_file = PathBuf::from(expand_env_vars(&self.progress_file.to_string_lossy()));
    }

    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let p = &overlay.progression;
        let l = &overlay.layout;
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            structure_file: overlay
                .structure_file
                .clone()
                .unwrap_or_else(|| self.structure_file.clone()),
            concepts_file: overlay
                .concepts_file
                .clone()
                .unwrap_or_else(|| self.concepts_file.clone()),
            progress_file: overlay
                .progress_file
                .clone()
                .unwrap_or_else(|| self.progress_file.clone()),
            progression: ProgressionSettings {
                trunk_threshold: p.trunk_threshold.unwrap_or(self.progression.trunk_threshold),
                branches_threshold: p
                    .branches_threshold
                    .unwrap_or(self.progression.branches_threshold),
                unlock_system: p.unlock_system.or(self.progression.unlock_system),
                prerequisite_check: p.prerequisite_check.or(self.progression.prerequisite_check),
            },
            layout: LayoutSettings {
                strategy: l.strategy.unwrap_or(self.layout.strategy),
                seed: l.seed.unwrap_or(self.layout.seed),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `data_dir` - Optional data directory from the command line; also where
    ///   the local config is looked up (cwd when absent)
    pub fn load(data_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit data directory
        if let Some(dir) = data_dir {
            current.data_dir = dir.to_path_buf();
        }

        // 4. Local config in the data directory
        let local_dir = data_dir.unwrap_or(Path::new("."));
        let local_path = local_config_path(local_dir);
        if local_path.exists() {
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        // 5. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply TAPMATH_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TAPMATH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("structure_file") {
            settings.structure_file = val;
        }
        if let Ok(val) = config.get_string("concepts_file") {
            settings.concepts_file = val;
        }
        if let Ok(val) = config.get_string("progress_file") {
            settings.progress_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get::<usize>("progression.trunk_threshold") {
            settings.progression.trunk_threshold = val;
        }
        if let Ok(val) = config.get::<usize>("progression.branches_threshold") {
            settings.progression.branches_threshold = val;
        }
        if let Ok(val) = config.get_bool("progression.unlock_system") {
            settings.progression.unlock_system = Some(val);
        }
        if let Ok(val) = config.get_bool("progression.prerequisite_check") {
            settings.progression.prerequisite_check = Some(val);
        }
        if let Ok(val) = config.get::<LayoutStrategy>("layout.strategy") {
            settings.layout.strategy = val;
        }
        if let Ok(val) = config.get::<u64>("layout.seed") {
            settings.layout.seed = val;
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
        r#"# tapmath configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/tapmath/tapmath.toml
#   Local:  <data_dir>/.tapmath.toml
#   Env:    TAPMATH_* environment variables (TAPMATH_PROGRESSION__TRUNK_THRESHOLD=3)

# Directory holding tree-structure.json and math-concepts.json
# data_dir = "."

# structure_file = "tree-structure.json"
# concepts_file = "math-concepts.json"

# Where completed concepts are saved
# progress_file = "~/.local/share/tapmath/tapmath-progress.json"

[progression]
# Completed roots needed to unlock the trunk
# trunk_threshold = 4

# Completed trunk concepts needed to unlock the branches
# branches_threshold = 6

# Override the switches of the tree structure document
# unlock_system = true
# prerequisite_check = true

[layout]
# "slots" (fixed positions) or "parametric" (arcs with seeded jitter)
# strategy = "slots"
# seed = 0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
