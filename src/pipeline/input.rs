//! CSV input: read the header and stream data rows as [`Entry`] values.
//!
//! The reader is lazy. Rows are pulled one at a time while the document is
//! being built, and the underlying file handle is closed when the
//! [`CsvInput`] is dropped, whether the run succeeded or not.

use crate::error::CfpError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Column names of the CSV, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    /// Build a header, stripping literal `"` characters (and a stray UTF-8
    /// byte-order mark) from every column name.
    pub fn new(columns: Vec<String>) -> Self {
        let columns = columns
            .into_iter()
            .map(|c| c.replace(['"', '\u{FEFF}'], ""))
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One data row: positional cells aligned with the [`Header`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    line: u64,
    values: Vec<String>,
}

impl Entry {
    pub fn new(line: u64, values: Vec<String>) -> Self {
        Self { line, values }
    }

    /// 1-indexed line in the source file where the row starts.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Cell at `index`, or `""` when the row has no such cell.
    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    /// Cell at an optional index; `""` when the column is absent.
    pub fn value_at(&self, index: Option<usize>) -> &str {
        index.map(|i| self.value(i)).unwrap_or("")
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// An open CSV source with its header already read.
pub struct CsvInput<R = File> {
    source: PathBuf,
    header: Header,
    reader: csv::Reader<R>,
}

/// Open `path` and read its header row.
///
/// # Errors
/// - [`CfpError::FileNotFound`] / [`CfpError::PermissionDenied`] when the file
///   cannot be opened
/// - [`CfpError::Csv`] when the header row cannot be tokenized
pub fn open_csv(path: &Path) -> Result<CsvInput<File>, CfpError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CfpError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => CfpError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => CfpError::Csv {
            path: path.to_path_buf(),
            source: csv::Error::from(e),
        },
    })?;
    debug!("Opened CSV: {}", path.display());
    CsvInput::from_reader(file, path)
}

impl<R: Read> CsvInput<R> {
    /// Wrap any reader. `source` is only used in error messages.
    pub fn from_reader(rdr: R, source: impl Into<PathBuf>) -> Result<Self, CfpError> {
        let source = source.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(rdr);

        let header = reader
            .headers()
            .map_err(|e| CfpError::Csv {
                path: source.clone(),
                source: e,
            })?
            .iter()
            .map(str::to_string)
            .collect();
        let header = Header::new(header);
        debug!("CSV header has {} columns", header.len());

        Ok(Self {
            source,
            header,
            reader,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Lazily iterate the data rows.
    pub fn entries(&mut self) -> Entries<'_, R> {
        Entries {
            source: &self.source,
            expected: self.header.len(),
            records: self.reader.records(),
        }
    }
}

/// Iterator over the data rows of a [`CsvInput`].
pub struct Entries<'a, R> {
    source: &'a Path,
    expected: usize,
    records: csv::StringRecordsIter<'a, R>,
}

impl<R: Read> Iterator for Entries<'_, R> {
    type Item = Result<Entry, CfpError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(record.map_err(|e| CfpError::Csv {
            path: self.source.to_path_buf(),
            source: e,
        }).and_then(|record| {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            if record.len() < self.expected {
                return Err(CfpError::ShortRow {
                    line,
                    expected: self.expected,
                    found: record.len(),
                });
            }
            // Extra trailing cells have no column name and are dropped.
            let values = record
                .iter()
                .take(self.expected)
                .map(str::to_string)
                .collect();
            Ok(Entry::new(line, values))
        }))
    }
}
