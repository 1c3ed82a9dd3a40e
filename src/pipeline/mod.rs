//! Batch pipeline
//!
//! Lines are decoded, filtered and country-matched in parallel, then joined
//! for a single-threaded dedup and aggregation pass.

pub mod aggregate;
pub mod dedup;
pub mod stats;

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use log::{debug, info};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use thiserror::Error;

use crate::filter::{CountryMatcher, FilterRejected, JunkFilter};
use crate::models::{CountryTable, ProxyRecord};
use crate::parser::{explode, resolve_remark, DecodeError};
use crate::settings::FilterSettings;

pub use aggregate::{Aggregate, Bucket, BucketCount};
pub use dedup::dedup;
pub use stats::RunStats;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("run cancelled")]
    Cancelled,

    #[error("invalid deny pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("failed to start decode workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Shared flag to abandon a run. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What happened to one input line in the parallel stage.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Retained(ProxyRecord),
    DecodeFailed(DecodeError),
    Rejected(FilterRejected),
}

/// Per-line classification: decode, resolve the remark, filter, match.
#[derive(Debug, Clone)]
pub struct Classifier {
    filter: JunkFilter,
    matcher: CountryMatcher,
}

impl Classifier {
    pub fn new(table: &CountryTable, filter: &FilterSettings) -> Result<Self, PipelineError> {
        Ok(Classifier {
            filter: JunkFilter::new(filter)?,
            matcher: CountryMatcher::new(table),
        })
    }

    pub fn classify(&self, line: &str) -> LineOutcome {
        let decoded = match explode(line) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!("Dropping undecodable line ({}): {}", e, preview(line));
                return LineOutcome::DecodeFailed(e);
            }
        };

        let remark = resolve_remark(&decoded);
        if let Some(remark) = &remark {
            if let Err(rejected) = self.filter.check(remark) {
                debug!("Filtering {} ({}): {}", decoded.protocol, rejected, preview(line));
                return LineOutcome::Rejected(rejected);
            }
        }

        let mut record = ProxyRecord::new(decoded.protocol, line, remark, decoded.dedup_key);
        if let Some(remark) = &record.remark {
            record.matched_countries = self.matcher.match_remark(remark);
        }
        LineOutcome::Retained(record)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub records: Vec<ProxyRecord>,
    pub aggregate: Aggregate,
    pub stats: RunStats,
}

/// The whole batch pipeline with its worker count.
#[derive(Debug, Clone)]
pub struct Pipeline {
    classifier: Classifier,
    workers: usize,
}

impl Pipeline {
    /// `workers == 0` uses one worker per available CPU.
    pub fn new(
        table: &CountryTable,
        filter: &FilterSettings,
        workers: usize,
    ) -> Result<Self, PipelineError> {
        let workers = if workers == 0 {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        } else {
            workers
        };
        Ok(Pipeline {
            classifier: Classifier::new(table, filter)?,
            workers,
        })
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Runs the batch. Output only exists if every line was processed; a
    /// cancelled run returns [`PipelineError::Cancelled`].
    pub fn run(&self, lines: &[String], cancel: &CancelToken) -> Result<RunOutput, PipelineError> {
        let outcomes = self.classify_all(lines, cancel)?;

        // Everything below runs after all workers have joined
        let mut stats = RunStats {
            input: lines.len(),
            ..RunStats::default()
        };
        let mut candidates = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                LineOutcome::Retained(record) => candidates.push(record),
                LineOutcome::DecodeFailed(e) => stats.record_decode_error(e.kind()),
                LineOutcome::Rejected(r) => stats.record_filter_rejection(r.kind()),
            }
        }

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let (records, duplicates) = dedup(candidates);
        stats.duplicates = duplicates;
        stats.retained = records.len();
        stats.unnamed = records.iter().filter(|r| r.remark.is_none()).count();
        stats.no_country = records
            .iter()
            .filter(|r| r.remark.is_some() && r.matched_countries.is_empty())
            .count();

        let aggregate = Aggregate::from_records(&records);

        info!(
            "Processed {} lines: {} retained, {} undecodable, {} filtered, {} duplicates",
            stats.input, stats.retained, stats.decode_failed, stats.filter_rejected, stats.duplicates
        );

        Ok(RunOutput {
            records,
            aggregate,
            stats,
        })
    }

    /// Classifies every line on a dedicated pool. Results come back in
    /// input order.
    fn classify_all(
        &self,
        lines: &[String],
        cancel: &CancelToken,
    ) -> Result<Vec<LineOutcome>, PipelineError> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Classifying {} lines with {} workers", lines.len(), self.workers);

        let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
        pool.install(|| {
            lines
                .par_iter()
                .map(|line| {
                    if cancel.is_cancelled() {
                        return Err(PipelineError::Cancelled);
                    }
                    Ok(self.classifier.classify(line))
                })
                .collect()
        })
    }
}

/// First 60 characters of a line, for log messages.
fn preview(line: &str) -> String {
    let mut preview: String = line.chars().take(60).collect();
    if line.chars().count() > 60 {
        preview.push_str("...");
    }
    preview
}
