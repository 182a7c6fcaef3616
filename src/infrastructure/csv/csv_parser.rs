// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV files into tables with encoding fallback and error handling

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;

use crate::domain::error::{AppError, Result};
use crate::domain::table::DataTable;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Comma-separated parser producing a [`DataTable`]. Cells are kept verbatim.
#[derive(Debug, Default)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw uploaded bytes
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let content = Self::decode(bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<DataTable> {
        let mut reader = ReaderBuilder::new()
            .flexible(true) // short rows are padded below
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(AppError::ParseError(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.len() > headers.len() {
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in row {}, saw {}",
                    headers.len(),
                    index + 1,
                    record.len()
                )));
            }

            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(DataTable::new(headers, rows))
    }

    /// UTF-8 (BOM stripped) when valid, otherwise Windows-1252
    fn decode(bytes: &[u8]) -> Cow<'_, str> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        match std::str::from_utf8(bytes) {
            Ok(content) => Cow::Borrowed(content),
            Err(_) => {
                let (content, _, _) = WINDOWS_1252.decode(bytes);
                content
            }
        }
    }
}
