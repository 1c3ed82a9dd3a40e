use std::collections::BTreeMap;

use serde::Serialize;

/// Per-run accounting of what happened to every input line.
///
/// `input == decode_failed + filter_rejected + duplicates + retained` always
/// holds after a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub input: usize,
    pub decode_failed: usize,
    pub filter_rejected: usize,
    pub duplicates: usize,
    pub retained: usize,
    /// Retained records with no resolvable remark.
    pub unnamed: usize,
    /// Retained records whose remark matched no country.
    pub no_country: usize,
    /// Decode failures by error kind.
    pub decode_errors: BTreeMap<String, usize>,
    /// Filter rejections by rule.
    pub filter_rules: BTreeMap<String, usize>,
}

impl RunStats {
    pub fn record_decode_error(&mut self, kind: &str) {
        self.decode_failed += 1;
        *self.decode_errors.entry(kind.to_string()).or_default() += 1;
    }

    pub fn record_filter_rejection(&mut self, kind: &str) {
        self.filter_rejected += 1;
        *self.filter_rules.entry(kind.to_string()).or_default() += 1;
    }

    pub fn dropped(&self) -> usize {
        self.decode_failed + self.filter_rejected + self.duplicates
    }
}
