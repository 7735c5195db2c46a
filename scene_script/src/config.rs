//! Command-line configuration.
//!
//! Settings come from an optional `scene_script.toml`:
//!
//! ```toml
//! [paths]
//! input = "contido/m68-master.html"
//! output = "web-app/src/data/historia.json"
//!
//! [passages]
//! reserved = ["StoryInit", "StoryTitle", "StoryData"]
//! ```
//!
//! Every key is optional. Command-line values override the file through
//! [`CliSettings`].

use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "scene_script.toml";

/// Twine's own control passages; they carry no scene content.
pub const RESERVED_PASSAGES: [&str; 3] = ["StoryInit", "StoryTitle", "StoryData"];

/// Command-line values that take precedence over the file.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub passages: PassagesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Published Twine HTML story.
    pub input: PathBuf,
    /// JSON document written for the presentation layer.
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("contido/m68-master.html"),
            output: PathBuf::from("web-app/src/data/historia.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PassagesConfig {
    /// Passage names left out of the compiled story.
    pub reserved: Vec<String>,
}

impl Default for PassagesConfig {
    fn default() -> Self {
        Self {
            reserved: RESERVED_PASSAGES.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load configuration, then apply command-line overrides.
    ///
    /// With an explicit `config_path` the file must exist. Otherwise
    /// `scene_script.toml` in the working directory is used when present, and
    /// built-in defaults when not.
    ///
    /// # Errors
    /// Returns an error when the chosen file cannot be read or parsed.
    pub fn load(config_path: Option<&Path>, cli_settings: &CliSettings) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if Path::new(CONFIG_FILENAME).is_file() {
            Self::load_from_file(Path::new(CONFIG_FILENAME))?
        } else {
            Self::default()
        };
        config.apply_cli_settings(cli_settings);
        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    /// Returns an error when the text is not valid TOML for this schema.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!("configuration loaded from {}", path.display());
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(input) = &settings.input {
            self.paths.input.clone_from(input);
        }
        if let Some(output) = &settings.output {
            self.paths.output.clone_from(output);
        }
    }

    pub fn is_reserved(&self, passage_name: &str) -> bool {
        self.passages.reserved.iter().any(|name| name == passage_name)
    }
}
