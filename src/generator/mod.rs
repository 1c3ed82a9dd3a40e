//! Output artifacts: per-bucket link files, the JSON summary and the
//! markdown report.

pub mod report;
pub mod writer;

use serde::Serialize;

use crate::models::CountryTable;
use crate::pipeline::{RunOutput, RunStats};
use crate::utils::file_stem;

pub use report::render_report;
pub use writer::{write_artifacts, WriteError};

/// Summary row for one protocol file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolSummary {
    pub protocol: String,
    pub count: usize,
    pub file: String,
}

/// Summary row for one country file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountrySummary {
    pub code: String,
    pub name: String,
    pub flag: Option<String>,
    pub native_name: Option<String>,
    pub count: usize,
    pub file: String,
}

/// Everything a presentation layer needs to describe a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub protocols: Vec<ProtocolSummary>,
    pub countries: Vec<CountrySummary>,
    pub stats: RunStats,
}

impl Summary {
    /// Builds the summary; protocols keep enum order, countries are sorted
    /// by display name.
    pub fn build(output: &RunOutput, table: &CountryTable) -> Self {
        let protocols = output
            .aggregate
            .protocols()
            .map(|(protocol, bucket)| ProtocolSummary {
                protocol: protocol.as_str().to_string(),
                count: bucket.len(),
                file: format!("{}.txt", file_stem(protocol.as_str())),
            })
            .collect();

        let mut countries: Vec<CountrySummary> = output
            .aggregate
            .countries()
            .map(|(code, bucket)| {
                let entry = table.get(code);
                let name = entry.map_or(code, |e| e.name.as_str()).to_string();
                CountrySummary {
                    code: code.to_string(),
                    file: format!("{}.txt", file_stem(&name)),
                    name,
                    flag: entry.and_then(|e| e.flag.clone()),
                    native_name: entry.and_then(|e| e.native_name.clone()),
                    count: bucket.len(),
                }
            })
            .collect();
        countries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));

        Summary {
            protocols,
            countries,
            stats: output.stats.clone(),
        }
    }
}
