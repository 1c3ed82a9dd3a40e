use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use super::{render_report, Summary};
use crate::models::CountryTable;
use crate::pipeline::RunOutput;
use crate::settings::ReportSettings;
use crate::utils::file_stem;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid output directory: {0}")]
    InvalidOutputDir(String),
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> WriteError + '_ {
    move |source| WriteError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), WriteError> {
    fs::write(path, content).map_err(io_error(path))
}

/// Write every artifact of a run into `output_dir`.
///
/// Files are first written to a sibling staging directory, which then
/// replaces `output_dir`. If anything fails the previous output is left as it
/// was. Returns the summary that was written.
pub fn write_artifacts(
    output_dir: &Path,
    output: &RunOutput,
    table: &CountryTable,
    report: &ReportSettings,
) -> Result<Summary, WriteError> {
    let staging = staging_dir(output_dir)?;
    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(io_error(&staging))?;
    }
    fs::create_dir_all(&staging).map_err(io_error(&staging))?;

    let summary = Summary::build(output, table);
    if let Err(e) = fill_staging(&staging, output, &summary, report) {
        if let Err(cleanup) = fs::remove_dir_all(&staging) {
            warn!("Failed to remove staging directory {}: {}", staging.display(), cleanup);
        }
        return Err(e);
    }

    swap_into_place(&staging, output_dir)?;

    info!(
        "Wrote {} protocol files and {} country files to {}",
        summary.protocols.len(),
        summary.countries.len(),
        output_dir.display()
    );
    Ok(summary)
}

fn fill_staging(
    staging: &Path,
    output: &RunOutput,
    summary: &Summary,
    report: &ReportSettings,
) -> Result<(), WriteError> {
    for (protocol, bucket) in output.aggregate.protocols() {
        let path = staging.join(format!("{}.txt", file_stem(protocol.as_str())));
        write_file(&path, &bucket.render())?;
    }

    for row in &summary.countries {
        if let Some(bucket) = output.aggregate.country(&row.code) {
            write_file(&staging.join(&row.file), &bucket.render())?;
        }
    }

    if !report.summary_file.is_empty() {
        let json = serde_json::to_string_pretty(summary)?;
        write_file(&staging.join(&report.summary_file), &json)?;
    }

    if report.enabled && !report.file.is_empty() {
        let markdown = render_report(summary, &report.link_base);
        write_file(&staging.join(&report.file), &markdown)?;
    }

    Ok(())
}

/// Moves the previous output aside, renames the staging directory into its
/// place and only then deletes the previous output. A failed rename puts the
/// previous output back.
fn swap_into_place(staging: &Path, output_dir: &Path) -> Result<(), WriteError> {
    let backup = sibling_dir(output_dir, "previous")?;
    if backup.exists() {
        fs::remove_dir_all(&backup).map_err(io_error(&backup))?;
    }

    let had_previous = output_dir.exists();
    if had_previous {
        if let Err(source) = fs::rename(output_dir, &backup) {
            if let Err(e) = fs::remove_dir_all(staging) {
                warn!("Failed to remove staging directory {}: {}", staging.display(), e);
            }
            return Err(WriteError::Io {
                path: output_dir.display().to_string(),
                source,
            });
        }
    }

    if let Err(source) = fs::rename(staging, output_dir) {
        if had_previous {
            if let Err(e) = fs::rename(&backup, output_dir) {
                warn!("Failed to restore {}: {}", output_dir.display(), e);
            }
        }
        if let Err(e) = fs::remove_dir_all(staging) {
            warn!("Failed to remove staging directory {}: {}", staging.display(), e);
        }
        return Err(WriteError::Io {
            path: output_dir.display().to_string(),
            source,
        });
    }

    if had_previous {
        if let Err(e) = fs::remove_dir_all(&backup) {
            warn!("Failed to remove previous output {}: {}", backup.display(), e);
        }
    }
    Ok(())
}

fn staging_dir(output_dir: &Path) -> Result<PathBuf, WriteError> {
    sibling_dir(output_dir, "staging")
}

fn sibling_dir(output_dir: &Path, suffix: &str) -> Result<PathBuf, WriteError> {
    let name = output_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| WriteError::InvalidOutputDir(output_dir.display().to_string()))?;
    Ok(output_dir.with_file_name(format!(".{}.{}", name, suffix)))
}
