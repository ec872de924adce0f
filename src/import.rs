use csv::ReaderBuilder;
use serde::Serialize;

use crate::api::ApiError;

pub const PREVIEW_ROWS: usize = 5;
/// Uploads above this size are refused before they reach the backend.
pub const MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024;

/// Columns the backend needs, with the header spellings broker exports use.
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("symbol", &["symbol", "ticker", "instrument", "pair"]),
    ("side", &["side", "direction", "action", "type"]),
    ("quantity", &["quantity", "qty", "shares", "size", "amount"]),
    ("price", &["price", "fill price", "avg price", "entry price"]),
    ("date", &["date", "time", "datetime", "timestamp", "trade date"]),
];

/// What the upload dialog shows before sending a CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvPreview {
    pub headers: Vec<String>,
    pub row_count: usize,
    pub sample_rows: Vec<Vec<String>>,
    pub missing_columns: Vec<&'static str>,
}

impl CsvPreview {
    pub fn is_importable(&self) -> bool {
        self.missing_columns.is_empty() && self.row_count > 0
    }
}

pub fn preview_csv(contents: &[u8]) -> Result<CsvPreview, ApiError> {
    if contents.len() > MAX_IMPORT_BYTES {
        return Err(ApiError::InvalidInput(format!(
            "File is larger than {} MB",
            MAX_IMPORT_BYTES / (1024 * 1024)
        )));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ApiError::InvalidInput("CSV file has no header row".to_string()));
    }

    let mut row_count = 0;
    let mut sample_rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        row_count += 1;
        if sample_rows.len() < PREVIEW_ROWS {
            sample_rows.push(record.iter().map(str::to_string).collect());
        }
    }

    let missing_columns = missing_columns(&headers);
    if !missing_columns.is_empty() {
        log::debug!("CSV preview is missing columns: {:?}", missing_columns);
    }

    Ok(CsvPreview {
        headers,
        row_count,
        sample_rows,
        missing_columns,
    })
}

fn missing_columns(headers: &[String]) -> Vec<&'static str> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.to_lowercase().replace(['_', '-'], " "))
        .collect();

    REQUIRED_COLUMNS
        .iter()
        .filter(|(_, aliases)| !normalized.iter().any(|h| aliases.contains(&h.as_str())))
        .map(|(column, _)| *column)
        .collect()
}
