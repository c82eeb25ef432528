use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::io::fsutil::{atomic_write, strip_bom};
use crate::model::record::Record;

/// Error type for record file I/O
#[derive(Debug, thiserror::Error)]
pub enum RecordFileError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed record file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("malformed record file: record {position} has element index 0")]
    ZeroIndex { position: usize },
    #[error("record file is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Parse record file content: a JSON array of records.
pub fn parse_records(text: &str) -> Result<Vec<Record>, RecordFileError> {
    let records: Vec<Record> = serde_json::from_str(strip_bom(text))?;
    if let Some(position) = records.iter().position(|r| r.element_index == 0) {
        return Err(RecordFileError::ZeroIndex {
            position: position + 1,
        });
    }
    Ok(records)
}

fn to_pretty_json(records: &[Record]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    records.serialize(&mut ser)?;
    Ok(out)
}

/// Serialize records as a pretty-printed JSON array (4-space indent).
pub fn serialize_records(records: &[Record]) -> Result<String, RecordFileError> {
    Ok(String::from_utf8(to_pretty_json(records)?)?)
}

/// Read and parse a record file
pub fn read_records(path: &Path) -> Result<Vec<Record>, RecordFileError> {
    let text = fs::read_to_string(path).map_err(|e| RecordFileError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_records(&text)
}

/// Write records to a file atomically. Nothing touches the disk unless
/// serialization succeeded.
pub fn write_records(path: &Path, records: &[Record]) -> Result<(), RecordFileError> {
    let mut content = to_pretty_json(records)?;
    content.push(b'\n');
    atomic_write(path, &content).map_err(|e| RecordFileError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
