use log::debug;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::settings::FilterSettings;

/// Why a remark was judged to be junk.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterRejected {
    #[error("remark too long ({length} chars, limit {limit})")]
    TooLong { length: usize, limit: usize },

    #[error("too many %25 sequences ({count}, limit {limit})")]
    TooManyPercent25 { count: usize, limit: usize },

    #[error("percent sign density {ratio:.2} above {max:.2}")]
    PercentDensity { ratio: f64, max: f64 },

    #[error("double-encoded percent sign (%2525)")]
    DoubleEncoded,

    #[error("matches deny pattern {0}")]
    DenyPattern(String),
}

impl FilterRejected {
    /// Stable label used to count rejections by rule.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterRejected::TooLong { .. } => "too_long",
            FilterRejected::TooManyPercent25 { .. } => "percent25_count",
            FilterRejected::PercentDensity { .. } => "percent_density",
            FilterRejected::DoubleEncoded => "double_encoded",
            FilterRejected::DenyPattern(_) => "deny_pattern",
        }
    }
}

/// Heuristic junk detector for remarks.
///
/// Built once per run from [`FilterSettings`]; checking is read-only and safe
/// to share between workers.
#[derive(Debug, Clone)]
pub struct JunkFilter {
    settings: FilterSettings,
    deny: Vec<Regex>,
}

impl JunkFilter {
    pub fn new(settings: &FilterSettings) -> Result<Self, regex::Error> {
        let deny = settings
            .deny_patterns
            .iter()
            .map(|pattern| RegexBuilder::new(pattern).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(JunkFilter {
            settings: settings.clone(),
            deny,
        })
    }

    /// Returns `Ok(())` to retain the remark, or the first rule it breaks.
    pub fn check(&self, remark: &str) -> Result<(), FilterRejected> {
        let settings = &self.settings;

        if let Some(pattern) = self.deny.iter().find(|re| re.is_match(remark)) {
            debug!("Remark hit deny pattern {}", pattern.as_str());
            return Err(FilterRejected::DenyPattern(pattern.as_str().to_string()));
        }

        let count = remark.matches("%25").count();
        if count >= settings.max_percent25_count {
            return Err(FilterRejected::TooManyPercent25 {
                count,
                limit: settings.max_percent25_count,
            });
        }

        let length = remark.chars().count();
        if length >= settings.max_remark_length {
            return Err(FilterRejected::TooLong {
                length,
                limit: settings.max_remark_length,
            });
        }

        if settings.reject_double_encoded && remark.contains("%2525") {
            return Err(FilterRejected::DoubleEncoded);
        }

        if length > 0 {
            let ratio = remark.matches('%').count() as f64 / length as f64;
            if ratio > settings.max_percent_ratio {
                return Err(FilterRejected::PercentDensity {
                    ratio,
                    max: settings.max_percent_ratio,
                });
            }
        }

        Ok(())
    }
}
