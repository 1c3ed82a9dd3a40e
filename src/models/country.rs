//! Country reference table
//!
//! The table is read once at startup and shared read-only with every worker.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::ProxyType;
use crate::utils::file_stem;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported country table format: {0}")]
    UnsupportedFormat(String),

    #[error("Country table is empty")]
    Empty,

    #[error("Country entry #{0} has no name")]
    MissingName(usize),

    #[error("Duplicate country code: {0}")]
    DuplicateCode(String),

    #[error("Countries {first} and {second} would both write {file}.txt")]
    DuplicateFileName {
        first: String,
        second: String,
        file: String,
    },
}

/// A single country with everything a remark can be matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryEntry {
    #[serde(default)]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Flag emoji or image reference shown next to the name in reports.
    #[serde(default)]
    pub flag: Option<String>,
    /// Name in the local script, shown in parentheses in reports.
    #[serde(default)]
    pub native_name: Option<String>,
}

impl CountryEntry {
    pub fn new(code: &str, name: &str, aliases: &[&str], flag: Option<&str>) -> Self {
        CountryEntry {
            code: code.to_string(),
            name: name.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            flag: flag.map(str::to_string),
            native_name: None,
        }
    }

    pub fn with_native_name(mut self, native_name: &str) -> Self {
        self.native_name = Some(native_name.to_string());
        self
    }

    /// The display name followed by every alias, blanks and repeats removed.
    pub fn candidates(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .filter(|c| seen.insert(c.to_ascii_lowercase()))
            .collect()
    }
}

/// Short keywords that are not purely alphanumeric are flags or symbols.
fn is_symbolic(keyword: &str) -> bool {
    let len = keyword.chars().count();
    (1..=7).contains(&len) && !keyword.chars().all(char::is_alphanumeric)
}

/// Written in a non-Latin script, e.g. `آلمان`.
fn is_native_script(keyword: &str) -> bool {
    keyword.chars().any(|c| c.is_alphabetic() && !c.is_ascii())
        && !keyword.chars().any(|c| c.is_ascii_alphabetic())
}

#[derive(Debug, Deserialize)]
struct CountryFile {
    countries: Vec<CountryEntry>,
}

/// Immutable, validated list of countries.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    entries: Vec<CountryEntry>,
}

impl CountryTable {
    /// Builds a table from entries, validating names and code uniqueness.
    /// A missing code falls back to the display name.
    pub fn new(entries: Vec<CountryEntry>) -> Result<Self, TableError> {
        if entries.is_empty() {
            return Err(TableError::Empty);
        }

        let mut codes = HashSet::new();
        // Lower-cased so case-insensitive filesystems cannot merge two files
        let mut stems: HashMap<String, String> = ProxyType::ALL
            .iter()
            .map(|p| (p.as_str().to_lowercase(), p.as_str().to_string()))
            .collect();
        let mut validated = Vec::with_capacity(entries.len());
        for (idx, mut entry) in entries.into_iter().enumerate() {
            entry.name = entry.name.trim().to_string();
            if entry.name.is_empty() {
                return Err(TableError::MissingName(idx));
            }
            entry.code = entry.code.trim().to_string();
            if entry.code.is_empty() {
                entry.code = entry.name.clone();
            }
            if !codes.insert(entry.code.clone()) {
                return Err(TableError::DuplicateCode(entry.code));
            }
            let stem = file_stem(&entry.name);
            if let Some(first) = stems.insert(stem.to_lowercase(), entry.name.clone()) {
                return Err(TableError::DuplicateFileName {
                    first,
                    second: entry.name,
                    file: stem,
                });
            }
            entry.native_name = entry
                .native_name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty());
            validated.push(entry);
        }

        Ok(CountryTable { entries: validated })
    }

    /// Loads a table from a file, picking the format by extension.
    ///
    /// `.toml` and `.yaml`/`.yml` files hold a `countries` list. `.json` files
    /// may hold either that list or a legacy keyword map, see
    /// [`CountryTable::from_keyword_map`].
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let content = fs::read_to_string(path).map_err(|source| TableError::Io {
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

    /// Parses table content in the given format (`toml`, `yaml`, `yml` or `json`).
    pub fn from_content(content: &str, format: &str) -> Result<Self, TableError> {
        match format {
            "toml" => {
                let file: CountryFile =
                    toml::from_str(content).map_err(|e| TableError::Parse(e.to_string()))?;
                Self::new(file.countries)
            }
            "yaml" | "yml" => {
                let file: CountryFile = serde_yaml::from_str(content)
                    .map_err(|e| TableError::Parse(e.to_string()))?;
                Self::new(file.countries)
            }
            "json" => {
                let value: Value =
                    serde_json::from_str(content).map_err(|e| TableError::Parse(e.to_string()))?;
                if value.get("countries").is_some_and(Value::is_array) {
                    let file: CountryFile = serde_json::from_value(value)
                        .map_err(|e| TableError::Parse(e.to_string()))?;
                    Self::new(file.countries)
                } else {
                    Self::from_keyword_map(&value)
                }
            }
            other => Err(TableError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Builds a table from a keyword map: `{"Germany": ["Germany", "DE", "آلمان", "🇩🇪"], ...}`.
    ///
    /// Keys naming a protocol (`"Vmess"`, ...) are skipped. The first short
    /// keyword that is not purely alphanumeric becomes the flag; short
    /// non-alphanumeric keywords are never used for matching. The code is the
    /// first two or three letter upper-case keyword, or the name itself. The
    /// first keyword in a non-Latin script becomes the native name.
    pub fn from_keyword_map(value: &Value) -> Result<Self, TableError> {
        let map = value
            .as_object()
            .ok_or_else(|| TableError::Parse("expected a JSON object".to_string()))?;

        let mut entries = Vec::new();
        for (name, keywords) in map {
            if ProxyType::is_protocol_name(name) {
                continue;
            }
            let keywords: Vec<&str> = keywords
                .as_array()
                .map(|arr| arr.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            let flag = keywords
                .iter()
                .find(|kw| kw.chars().count() >= 2 && is_symbolic(kw))
                .map(|kw| kw.to_string());

            let code = keywords
                .iter()
                .find(|kw| (2..=3).contains(&kw.len()) && kw.chars().all(|c| c.is_ascii_uppercase()))
                .map(|kw| kw.to_string())
                .unwrap_or_else(|| name.clone());

            let aliases = keywords
                .iter()
                .filter(|kw| !is_symbolic(kw))
                .map(|kw| kw.to_string())
                .collect();

            let native_name = keywords
                .iter()
                .find(|kw| is_native_script(kw))
                .map(|kw| kw.to_string());

            entries.push(CountryEntry {
                code,
                name: name.clone(),
                aliases,
                flag,
                native_name,
            });
        }

        Self::new(entries)
    }

    pub fn entries(&self) -> &[CountryEntry] {
        &self.entries
    }

    pub fn get(&self, code: &str) -> Option<&CountryEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
