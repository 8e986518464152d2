//! Line-oriented batch workloads.
//!
//! ```text
//! N
//! <document 0>
//! ...
//! <document N-1>
//! Q
//! <doc_id> <k>
//! ...
//! ```
//!
//! Documents are split on whitespace, so an empty line is an empty document.
//! The query section may be omitted entirely (treated as `Q = 0`).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::core::errors::{NeardupError, Result};
use crate::detectors::simhash::Query;

/// Counts come from untrusted input; larger corpora grow on demand.
const MAX_PREALLOCATED: usize = 1 << 16;

/// Tokenized documents plus structured queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workload {
    /// Documents in input order
    pub documents: Vec<Vec<String>>,
    /// Queries in input order
    pub queries: Vec<Query>,
}

/// Split a document line into tokens
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

impl Workload {
    /// Read a workload file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            NeardupError::io(format!("Failed to open workload: {}", path.display()), e)
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a workload held in memory
    pub fn parse_str(input: &str) -> Result<Self> {
        Self::from_reader(input.as_bytes())
    }

    /// Parse a workload from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = NumberedLines::new(reader);

        let (count_line, text) = lines
            .next_line()?
            .ok_or_else(|| NeardupError::parse("empty input: expected document count"))?;
        let doc_count = parse_count(&text, count_line, "document count")?;

        let mut documents = Vec::with_capacity(doc_count.min(MAX_PREALLOCATED));
        for i in 0..doc_count {
            let (_, text) = lines.next_line()?.ok_or_else(|| {
                NeardupError::parse(format!("expected {doc_count} documents, found {i}"))
            })?;
            documents.push(tokenize(&text));
        }

        let mut queries = Vec::new();
        if let Some((query_line, text)) = lines.next_line()? {
            let query_count = parse_count(&text, query_line, "query count")?;
            queries.reserve(query_count.min(MAX_PREALLOCATED));
            for i in 0..query_count {
                let (line, text) = lines.next_line()?.ok_or_else(|| {
                    NeardupError::parse(format!("expected {query_count} queries, found {i}"))
                })?;
                queries.push(parse_query(&text, line)?);
            }
        }

        while let Some((line, text)) = lines.next_line()? {
            if !text.trim().is_empty() {
                return Err(NeardupError::parse_at("unexpected input after last query", line));
            }
        }

        debug!(
            documents = documents.len(),
            queries = queries.len(),
            "Parsed workload"
        );
        Ok(Self { documents, queries })
    }
}

/// Parse a `doc_id k` query line
pub fn parse_query(text: &str, line: usize) -> Result<Query> {
    let mut fields = text.split_whitespace();
    let (Some(doc), Some(k), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(NeardupError::parse_at(
            format!("expected `<doc_id> <k>`, got {text:?}"),
            line,
        ));
    };

    let doc: i128 = doc
        .parse()
        .map_err(|e| NeardupError::parse_at(format!("invalid document index {doc:?}: {e}"), line))?;
    let k: i128 = k
        .parse()
        .map_err(|e| NeardupError::parse_at(format!("invalid threshold {k:?}: {e}"), line))?;

    Query::from_signed(doc, k)
}

fn parse_count(text: &str, line: usize, what: &str) -> Result<usize> {
    text.trim()
        .parse()
        .map_err(|e| NeardupError::parse_at(format!("invalid {what} {:?}: {e}", text.trim()), line))
}

/// Line reader yielding 1-based line numbers
struct NumberedLines<R> {
    lines: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        match self.lines.next() {
            None => Ok(None),
            Some(Ok(text)) => {
                self.line += 1;
                Ok(Some((self.line, text)))
            }
            Some(Err(e)) => Err(NeardupError::io(
                format!("Failed to read line {}", self.line + 1),
                e,
            )),
        }
    }
}
