use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::parsers::browser::HistoryRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write export {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize export record: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct ExportRecord<'a> {
    run_id: &'a str,
    #[serde(flatten)]
    record: &'a HistoryRecord,
}

/// Writes one JSON object per record and returns how many were written.
pub fn write_jsonl(
    path: &Path,
    run_id: &str,
    records: &[HistoryRecord],
) -> Result<usize, ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, &ExportRecord { run_id, record })?;
        writer.write_all(b"\n").map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(records.len())
}
