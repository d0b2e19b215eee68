pub mod xlsx;

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::record::{Field, Record};

pub const EXPORT_FILE_NAME: &str = "my_praise_records.xlsx";
pub const SHEET_NAME: &str = "칭찬기록";
pub const NOTHING_TO_EXPORT_NOTICE: &str = "내보낼 데이터가 없습니다.";

/// Export columns in order: header and source field.
pub const COLUMNS: [(&str, Field); 8] = [
    ("기록시간", Field::Timestamp),
    ("닉네임", Field::Nickname),
    ("점수", Field::Score),
    ("기분", Field::Mood),
    ("단어", Field::Word),
    ("요약", Field::Summary),
    ("칭찬/격려", Field::Praise),
    ("도움된점", Field::Helpful),
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("내보낼 데이터가 없습니다.")]
    NothingToExport,

    #[error("failed to create export directory: {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write workbook: {path}: {source}")]
    Xlsx {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Blank,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Cell::Blank,
            Some(Value::String(s)) => Cell::Text(s.clone()),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) => Cell::Number(f),
                None => Cell::Text(n.to_string()),
            },
            Some(Value::Bool(b)) => Cell::Bool(*b),
            Some(other) => Cell::Text(other.to_string()),
        }
    }
}

/// Rows ready for the spreadsheet writer; every row has one cell per header.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

/// Maps cached records to export rows, dropping rows without a score.
pub fn build_table(records: &[Record]) -> Result<ExportTable, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    let rows: Vec<Vec<Cell>> = records
        .iter()
        .filter(|r| r.get(Field::Score).is_some())
        .map(|r| {
            COLUMNS
                .iter()
                .map(|(_, field)| Cell::from_value(r.get(*field)))
                .collect::<Vec<_>>()
        })
        .collect();
    Ok(ExportTable {
        headers: COLUMNS.iter().map(|(header, _)| *header).collect(),
        rows,
    })
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    /// The guard case: nothing cached, no file produced.
    NothingToExport,
}

impl ExportOutcome {
    pub fn notice(&self) -> String {
        match self {
            ExportOutcome::Written { path, rows } => {
                format!("{}개의 기록을 {}에 저장했습니다.", rows, path.display())
            }
            ExportOutcome::NothingToExport => NOTHING_TO_EXPORT_NOTICE.to_string(),
        }
    }
}

pub fn export_to_spreadsheet(records: &[Record], dir: &Path) -> Result<ExportOutcome, ExportError> {
    let table = match build_table(records) {
        Ok(table) => table,
        Err(ExportError::NothingToExport) => {
            tracing::info!("export skipped, no cached records");
            return Ok(ExportOutcome::NothingToExport);
        }
        Err(e) => return Err(e),
    };

    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.display().to_string(),
        source,
    })?;
    let path = dir.join(EXPORT_FILE_NAME);
    xlsx::write_xlsx(&table, &path)?;
    tracing::info!(path = %path.display(), rows = table.rows.len(), "records exported");

    Ok(ExportOutcome::Written {
        path,
        rows: table.rows.len(),
    })
}
