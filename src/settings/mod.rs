//! Settings module
//!
//! Run configuration loaded from a TOML or YAML file. Every field has a
//! default, so an empty file (or no file at all) is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported settings format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "output_configs".to_string()
}

fn default_countries() -> String {
    "base/countries.toml".to_string()
}

fn default_max_remark_length() -> usize {
    512
}

fn default_max_percent25_count() -> usize {
    15
}

fn default_max_percent_ratio() -> f64 {
    0.3
}

fn default_deny_patterns() -> Vec<String> {
    vec!["i_love_".to_string()]
}

fn default_report_file() -> String {
    "README.md".to_string()
}

fn default_summary_file() -> String {
    "summary.json".to_string()
}

/// Common settings section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonSettings {
    /// Input files; `-` reads stdin.
    pub inputs: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Country table path.
    #[serde(default = "default_countries")]
    pub countries: String,
    /// Decode workers, 0 means one per available CPU.
    pub workers: usize,
    /// Pull links out of free text instead of reading one link per line.
    pub extract_links: bool,
}

impl Default for CommonSettings {
    fn default() -> Self {
        CommonSettings {
            inputs: Vec::new(),
            output_dir: default_output_dir(),
            countries: default_countries(),
            workers: 0,
            extract_links: false,
        }
    }
}

/// Junk remark heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Remarks with this many characters or more are rejected.
    #[serde(default = "default_max_remark_length", alias = "length_limit")]
    pub max_remark_length: usize,
    /// Remarks with this many `%25` sequences or more are rejected.
    #[serde(default = "default_max_percent25_count", alias = "percent25_limit")]
    pub max_percent25_count: usize,
    /// Upper bound for `%` characters per character of remark.
    #[serde(default = "default_max_percent_ratio")]
    pub max_percent_ratio: f64,
    /// Reject any remark containing `%2525`.
    #[serde(default = "default_true")]
    pub reject_double_encoded: bool,
    /// Case-insensitive regular expressions for known junk generators.
    #[serde(default = "default_deny_patterns")]
    pub deny_patterns: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            max_remark_length: default_max_remark_length(),
            max_percent25_count: default_max_percent25_count(),
            max_percent_ratio: default_max_percent_ratio(),
            reject_double_encoded: true,
            deny_patterns: default_deny_patterns(),
        }
    }
}

/// Output report section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Markdown report file name, written inside the output directory.
    #[serde(default = "default_report_file")]
    pub file: String,
    /// Prefix for file links in the report, e.g. a raw GitHub URL.
    pub link_base: String,
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            enabled: true,
            file: default_report_file(),
            link_base: String::new(),
            summary_file: default_summary_file(),
        }
    }
}

/// Settings structure holding the whole run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub common: CommonSettings,
    pub filter: FilterSettings,
    pub report: ReportSettings,
}

impl Settings {
    /// Loads settings from a file, picking the format by extension.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        Self::from_content(&content, &ext)
    }

    /// Parses settings content in the given format (`toml`, `yaml` or `yml`).
    pub fn from_content(content: &str, format: &str) -> Result<Self, SettingsError> {
        let settings: Settings = match format {
            "toml" => toml::from_str(content)?,
            "yaml" | "yml" => {
                if content.trim().is_empty() {
                    Settings::default()
                } else {
                    serde_yaml::from_str(content)?
                }
            }
            other => return Err(SettingsError::UnsupportedFormat(other.to_string())),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let ratio = self.filter.max_percent_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(SettingsError::Invalid {
                key: "filter.max_percent_ratio",
                reason: format!("{} is outside 0.0..=1.0", ratio),
            });
        }
        if self.filter.max_remark_length == 0 {
            return Err(SettingsError::Invalid {
                key: "filter.max_remark_length",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.common.output_dir.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: "common.output_dir",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
