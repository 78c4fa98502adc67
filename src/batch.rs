//! Batch conversion: resolved topic-map paths in, converted files out.
//!
//! For every logical path `p` the runner converts
//! `{input_dir}/{p}.{source_extension}` into `{output_dir}/{p}.{output_extension}`,
//! one document at a time and in resolution order.
//!
//! # Error Handling
//! - A document whose conversion fails (the tool exits non-zero) is logged with
//!   the tool's output and skipped; the batch carries on.
//! - Anything else (missing source, missing tool, filesystem errors) means the
//!   setup is wrong, and the batch stops with that error.
//!
//! The [`BatchReport`] lists what was converted and what was skipped; the CLI
//! turns a non-empty skip list into a "partial failure" exit code.

use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::config::BatchConfig;
use crate::contract::Renderer;
use crate::convert::{AsciidocConverter, ConversionJob};
use crate::error::ConvertError;
use crate::topic_map::ResolvedPath;

#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConvertedDocument>,
    pub failed: Vec<FailedDocument>,
}

#[derive(Debug)]
pub struct ConvertedDocument {
    pub path: ResolvedPath,
    pub destination: PathBuf,
}

#[derive(Debug)]
pub struct FailedDocument {
    pub path: ResolvedPath,
    pub error: ConvertError,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Map a logical path onto the source and destination files of its job.
pub fn job_for(config: &BatchConfig, path: &ResolvedPath) -> ConversionJob {
    ConversionJob::new(
        config
            .input_dir
            .join(path.with_extension(&config.source_extension)),
        config
            .output_dir
            .join(path.with_extension(&config.output_extension)),
    )
}

/// Convert every path in order. See the module docs for the failure policy.
pub async fn run_batch<R>(
    converter: &AsciidocConverter<R>,
    config: &BatchConfig,
    paths: &[ResolvedPath],
) -> Result<BatchReport, ConvertError>
where
    R: Renderer,
{
    config.trace_loaded();
    info!(files = paths.len(), "[BATCH] Starting conversion");

    let mut report = BatchReport::default();

    for path in paths {
        let job = job_for(config, path);

        if let Some(parent) = job.destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConvertError::io(parent, e))?;
        }

        match converter.convert(&job).await {
            Ok(()) => {
                info!(document = %path, destination = %job.destination.display(), "[BATCH] Converted");
                report.converted.push(ConvertedDocument {
                    path: path.clone(),
                    destination: job.destination,
                });
            }
            Err(e) if e.is_recoverable() => {
                if let ConvertError::ConversionFailed { code, stdout, stderr, .. } = &e {
                    warn!(
                        document = %path,
                        code = ?code,
                        stdout = %stdout.trim(),
                        stderr = %stderr.trim(),
                        "[BATCH] Conversion failed, skipping document"
                    );
                }
                report.failed.push(FailedDocument {
                    path: path.clone(),
                    error: e,
                });
            }
            Err(e) => {
                error!(document = %path, error = %e, "[BATCH][ERROR] Aborting batch");
                return Err(e);
            }
        }
    }

    info!(
        converted = report.converted.len(),
        failed = report.failed.len(),
        "[BATCH] Finished"
    );
    Ok(report)
}
