//! # Halflife Loader
//!
//! Reads a comma-separated dataset into a `RawTable`: the header row plus every
//! data row as untyped, trimmed strings. No column is interpreted here; schema
//! checks and numeric parsing belong to the `analytics` crate.

pub mod error;
pub mod table;

pub use error::LoaderError;
pub use table::{RawRow, RawTable};

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Opens `path` and reads it as CSV.
pub fn load_path(path: impl AsRef<Path>) -> Result<RawTable, LoaderError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoaderError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let table = load_reader(file)?;
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers().len(),
        "Loaded dataset."
    );
    Ok(table)
}

/// Reads CSV from an in-memory upload.
pub fn load_bytes(bytes: &[u8]) -> Result<RawTable, LoaderError> {
    load_reader(bytes)
}

/// Reads CSV from any reader. Rows may be ragged; missing trailing cells read
/// as absent rather than failing the whole file. Cells that are not valid
/// UTF-8 are decoded lossily so one badly encoded row cannot reject the file.
pub fn load_reader<R: Read>(reader: R) -> Result<RawTable, LoaderError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = decode(rdr.byte_headers()?);
    if headers.iter().all(String::is_empty) {
        return Err(LoaderError::MissingHeader);
    }

    let mut rows = Vec::new();
    for (index, result) in rdr.byte_records().enumerate() {
        let record = result?;
        rows.push(RawRow::new(index + 1, decode(&record)));
    }

    tracing::debug!(rows = rows.len(), "Parsed CSV records.");
    Ok(RawTable::new(headers, rows))
}

fn decode(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}
