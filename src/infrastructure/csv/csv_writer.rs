// ============================================================
// CSV WRITER
// ============================================================
// Serialize tables back to UTF-8 CSV (header row, no index column)

use csv::WriterBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::table::DataTable;

pub fn write_table(table: &DataTable) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV writer: {}", e)))?;

    // Cells are Rust strings, so the output is always UTF-8
    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("CSV output is not UTF-8: {}", e)))
}
