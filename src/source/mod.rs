//! Record Source: delimited text input.
//!
//! Produces a lazy, single-pass sequence of [`Row`]s from a delimited text
//! file. The input format is one record per line, so reading is
//! line-oriented; each non-blank line is parsed with standard delimited-text
//! conventions (quoted fields may embed the delimiter, doubled quote
//! characters encode a literal quote). Blank lines yield a zero-column row
//! so the loader can count them.
//!
//! The file handle is owned by the source and released on drop; re-reading
//! requires opening a fresh source.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

use crate::error_handling::LoadError;

/// One input row: its 1-based line number and parsed columns.
///
/// `fields` is empty for blank lines and for lines the parser rejected.
#[derive(Debug, Clone)]
pub struct Row {
    /// 1-based line number in the input file.
    pub index: usize,
    /// Parsed column values, in input order.
    pub fields: Vec<String>,
}

/// Lazily yields [`Row`]s from a delimited text file.
pub struct RecordSource {
    lines: Lines<BufReader<File>>,
    path: PathBuf,
    delimiter: u8,
    quote: u8,
    next_index: usize,
}

impl RecordSource {
    /// Opens `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::SourceUnavailable`] if the file cannot be
    /// opened.
    pub async fn open(path: &Path, delimiter: u8, quote: u8) -> Result<Self, LoadError> {
        let file = File::open(path)
            .await
            .map_err(|e| LoadError::SourceUnavailable {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(RecordSource {
            lines: BufReader::new(file).lines(),
            path: path.to_path_buf(),
            delimiter,
            quote,
            next_index: 1,
        })
    }

    /// Returns the next row, or `None` when the input is exhausted.
    ///
    /// # Errors
    ///
    /// An I/O error mid-iteration is fatal and surfaces as
    /// [`LoadError::SourceUnavailable`].
    pub async fn next_row(&mut self) -> Result<Option<Row>, LoadError> {
        let line = self
            .lines
            .next_line()
            .await
            .map_err(|e| LoadError::SourceUnavailable {
                path: self.path.clone(),
                source: e,
            })?;
        Ok(line.map(|line| {
            let index = self.next_index;
            self.next_index += 1;
            Row {
                index,
                fields: parse_fields(&line, index, self.delimiter, self.quote),
            }
        }))
    }
}

/// Counts the data rows (non-blank lines) in `path`.
///
/// Separate preliminary pass over the input; the file is opened and closed
/// independently of the load itself.
pub async fn count_data_rows(path: &Path) -> Result<usize, LoadError> {
    let file = File::open(path)
        .await
        .map_err(|e| LoadError::SourceUnavailable {
            path: path.to_path_buf(),
            source: e,
        })?;
    let mut lines = BufReader::new(file).lines();
    let mut count = 0usize;
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| LoadError::SourceUnavailable {
            path: path.to_path_buf(),
            source: e,
        })?
    {
        if !line.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

/// Parses one line into columns with the configured delimiter and quote.
///
/// Blank lines produce zero columns. A line the CSV parser rejects is
/// logged and also produces zero columns, so it is counted as skipped
/// rather than aborting the run.
fn parse_fields(line: &str, index: usize, delimiter: u8, quote: u8) -> Vec<String> {
    if line.trim().is_empty() {
        return Vec::new();
    }
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        Some(Err(e)) => {
            log::warn!("row {index}: unparseable line skipped: {e}");
            Vec::new()
        }
        None => Vec::new(),
    }
}
