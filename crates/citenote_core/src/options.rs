/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Persisted configuration.
//!
//! Keys are camelCase so an existing plugin `data.json` loads unchanged.
//! Missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TITLE_TEMPLATE: &str = "@{{citekey}}";
pub const DEFAULT_PATH_TEMPLATE: &str = "Reading notes/{{noteTitle}}.md";
pub const DEFAULT_CONTENT_TEMPLATE: &str =
    "---\ntitle: {{title}}\nauthors: {{authorString}}\nyear: {{year}}\n---\n\n";
pub const DEFAULT_PATH_REPLACEMENT: &str = "_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid {format} configuration: {message}")]
    Parse {
        format: ConfigFormat,
        message: String,
    },

    #[error("cannot serialize configuration as {format}: {message}")]
    Serialize {
        format: ConfigFormat,
        message: String,
    },
}

/// On-disk formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// `.toml` and `.yaml`/`.yml` are recognized; anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigFormat::Json => write!(f, "JSON"),
            ConfigFormat::Toml => write!(f, "TOML"),
            ConfigFormat::Yaml => write!(f, "YAML"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Location of the CSL-JSON export. Without it no library is loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_export_path: Option<PathBuf>,
    /// Renders the note title from entry fields.
    pub literature_note_title_template: String,
    /// Renders the vault-relative note path from `{{noteTitle}}`.
    pub literature_note_path_template: String,
    /// Renders the initial content of a new note from entry fields.
    pub literature_note_content_template: String,
    /// Substituted for characters a file name cannot contain.
    pub path_replacement: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            citation_export_path: None,
            literature_note_title_template: DEFAULT_TITLE_TEMPLATE.to_string(),
            literature_note_path_template: DEFAULT_PATH_TEMPLATE.to_string(),
            literature_note_content_template: DEFAULT_CONTENT_TEMPLATE.to_string(),
            path_replacement: DEFAULT_PATH_REPLACEMENT.to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse { format, message };
        match format {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            ConfigFormat::Yaml => {
                // An empty YAML document means "all defaults".
                if content.trim().is_empty() {
                    return Ok(Self::default());
                }
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
        }
    }

    pub fn to_string_as(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        let serialize_error = |message: String| ConfigError::Serialize { format, message };
        match format {
            ConfigFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| serialize_error(e.to_string()))
            }
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| serialize_error(e.to_string()))
            }
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| serialize_error(e.to_string())),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_string_as(ConfigFormat::from_path(path))?;
        fs::write(path, content)?;
        Ok(())
    }
}
