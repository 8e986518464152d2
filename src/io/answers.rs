//! Writing query answers and fingerprints.

use std::io::Write;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::errors::{NeardupError, Result};
use crate::detectors::simhash::{Fingerprint, Query};

/// Answer output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One count per line
    #[default]
    Text,
    /// JSON array of query records with counts
    Json,
}

/// A query and its answer, as written in JSON output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Queried document
    pub doc_id: usize,
    /// Threshold used
    pub threshold: u32,
    /// Documents within the threshold
    pub count: usize,
}

/// Write answers in `format`; `queries` and `answers` must align
pub fn write_answers<W: Write>(
    writer: &mut W,
    queries: &[Query],
    answers: &[usize],
    format: OutputFormat,
) -> Result<()> {
    if queries.len() != answers.len() {
        return Err(NeardupError::internal(format!(
            "{} answers for {} queries",
            answers.len(),
            queries.len()
        )));
    }

    match format {
        OutputFormat::Text => {
            for count in answers {
                writeln!(writer, "{count}")?;
            }
        }
        OutputFormat::Json => {
            let records: Vec<AnswerRecord> = queries
                .iter()
                .zip(answers)
                .map(|(query, &count)| AnswerRecord {
                    doc_id: query.doc_id,
                    threshold: query.threshold,
                    count,
                })
                .collect();
            serde_json::to_writer_pretty(&mut *writer, &records)?;
            writeln!(writer)?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write one hex fingerprint per line (text) or a JSON array of hex strings
pub fn write_fingerprints<W: Write>(
    writer: &mut W,
    fingerprints: &[Fingerprint],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for fingerprint in fingerprints {
                writeln!(writer, "{fingerprint}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, fingerprints)?;
            writeln!(writer)?;
        }
    }

    writer.flush()?;
    Ok(())
}
