use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// `num_parents` accepts a count or the keyword `"all"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumParents {
    Count(usize),
    Keyword(String),
}

impl Default for NumParents {
    fn default() -> Self {
        NumParents::Count(0)
    }
}

impl fmt::Display for NumParents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumParents::Count(n) => write!(f, "{n}"),
            NumParents::Keyword(k) => f.write_str(k),
        }
    }
}

/// Default conversion options. Every key is optional; per-block tags and CLI
/// flags override these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// A Roam `.json` export, or a directory of them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<PathBuf>,
    pub deck: String,
    pub note_basic: String,
    pub note_cloze: String,
    pub pageref_cloze: String,
    pub tag_ankify: String,
    /// Empty disables the exclusion tag.
    pub tag_dont_ankify: String,
    /// Empty disables the root tag.
    pub tag_ankify_root: String,
    pub num_parents: NumParents,
    pub include_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    pub tags_from_attr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_path: None,
            deck: "Default".to_string(),
            note_basic: "Roam Basic".to_string(),
            note_cloze: "Roam Cloze".to_string(),
            pageref_cloze: "outside".to_string(),
            tag_ankify: "ankify".to_string(),
            tag_dont_ankify: "dont-ankify".to_string(),
            tag_ankify_root: "ankify-root".to_string(),
            num_parents: NumParents::default(),
            include_page: false,
            max_depth: None,
            tags_from_attr: false,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the export path
        if let Some(path) = config.export_path.take() {
            config.export_path = Some(Self::expand_path(&path).unwrap_or(path));
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/roamcards");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
