use crate::models::CountryTable;
use crate::utils::matcher::contains_bounded;

/// Matches remarks against the country table.
///
/// Candidate lists are computed once from the table; matching borrows
/// nothing mutable and can be shared across workers.
#[derive(Debug, Clone)]
pub struct CountryMatcher {
    countries: Vec<(String, Vec<String>)>,
}

impl CountryMatcher {
    pub fn new(table: &CountryTable) -> Self {
        let countries = table
            .entries()
            .iter()
            .map(|entry| {
                let candidates = entry.candidates().into_iter().map(str::to_string).collect();
                (entry.code.clone(), candidates)
            })
            .collect();
        CountryMatcher { countries }
    }

    /// Codes of every country whose name or alias occurs in `remark` at a
    /// word boundary, in table order. Empty when nothing matches.
    pub fn match_remark(&self, remark: &str) -> Vec<String> {
        if remark.trim().is_empty() {
            return Vec::new();
        }

        self.countries
            .iter()
            .filter(|(_, candidates)| {
                candidates
                    .iter()
                    .any(|candidate| contains_bounded(remark, candidate))
            })
            .map(|(code, _)| code.clone())
            .collect()
    }
}
