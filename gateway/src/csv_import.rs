//! Bulk batch creation from CSV
//!
//! The header row names the columns; `batchId, cropName, variety, location,
//! harvestDate` are required and extra columns are ignored. Every data row is
//! one create attempt and fails on its own.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::forms::BatchForm;
use crate::ledger::RecordStore;
use crate::records::NewBatch;

pub const REQUIRED_COLUMNS: [&str; 5] = ["batchId", "cropName", "variety", "location", "harvestDate"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsvError {
    #[error("CSV file must contain at least a header and one data row")]
    NoDataRows,

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSuccess {
    pub batch_id: String,
    pub success: bool,
    pub transaction_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFailure {
    /// 1-based row in the file, header included, blank lines skipped
    pub row: usize,
    pub batch_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub total_rows: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<RowSuccess>,
    pub errors: Vec<RowFailure>,
}

/// Parsed upload: column positions plus the raw data rows
#[derive(Debug)]
pub struct BatchSheet {
    columns: [usize; 5],
    width: usize,
    rows: Vec<(usize, Vec<String>)>,
}

impl BatchSheet {
    pub fn parse(content: &str) -> Result<Self, CsvError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());

        let header = split_line(lines.next().ok_or(CsvError::NoDataRows)?);
        let mut columns = [0usize; 5];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = header
                .iter()
                .position(|h| h == name)
                .ok_or(CsvError::MissingColumn(name))?;
        }

        let rows: Vec<_> = lines.zip(2usize..).map(|(line, row)| (row, split_line(line))).collect();
        if rows.is_empty() {
            return Err(CsvError::NoDataRows);
        }

        Ok(Self {
            columns,
            width: header.len(),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validated batches in file order, or the failure for each bad row
    pub fn batches(&self) -> impl Iterator<Item = Result<NewBatch, RowFailure>> + '_ {
        self.rows.iter().map(move |(row, fields)| {
            let value = |i: usize| fields.get(self.columns[i]).cloned();
            let batch_id = value(0).filter(|id| !id.is_empty());
            let fail = |error: String| RowFailure {
                row: *row,
                batch_id: batch_id.clone().unwrap_or_else(|| "Unknown".to_string()),
                error,
            };

            if fields.len() < self.width {
                return Err(fail(format!(
                    "Row has {} columns, expected {}",
                    fields.len(),
                    self.width
                )));
            }

            BatchForm {
                batch_id: value(0),
                crop_name: value(1),
                variety: value(2),
                location: value(3),
                harvest_date: value(4).map(|date| date.as_str().into()),
            }
            .validate()
            .map_err(|err| fail(err.to_string()))
        })
    }
}

/// Split one line on commas; double-quoted fields may contain commas and `""`.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => quoted = false,
            ('"', false) if field.trim().is_empty() => {
                field.clear();
                quoted = true;
            }
            (',', false) => fields.push(std::mem::take(&mut field).trim().to_string()),
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

/// Create one batch per data row, collecting per-row outcomes
pub async fn import(store: &dyn RecordStore, content: &str) -> Result<ImportReport, CsvError> {
    let sheet = BatchSheet::parse(content)?;
    let mut report = ImportReport {
        total_rows: sheet.len(),
        ..Default::default()
    };

    for (outcome, row) in sheet.batches().zip(sheet.rows.iter().map(|(row, _)| *row)) {
        let batch = match outcome {
            Ok(batch) => batch,
            Err(failure) => {
                report.errors.push(failure);
                continue;
            }
        };

        let batch_id = batch.batch_id.clone();
        match store.create_batch(batch).await {
            Ok(receipt) => report.results.push(RowSuccess {
                batch_id,
                success: true,
                transaction_hash: receipt.transaction_hash,
            }),
            Err(err) => report.errors.push(RowFailure {
                row,
                batch_id,
                error: err.to_string(),
            }),
        }
    }

    report.successful = report.results.len();
    report.failed = report.errors.len();
    if report.failed > 0 {
        warn!(failed = report.failed, "CSV import had failing rows");
    }
    info!(
        total = report.total_rows,
        successful = report.successful,
        "CSV import finished"
    );
    Ok(report)
}
