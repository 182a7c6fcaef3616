// ============================================================
// BATCH PREDICTION USE CASE
// ============================================================
// Parse an uploaded CSV, check the required columns, predict every row
// and return the augmented table for display and download

use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::error::{AppError, Result};
use crate::domain::prediction::{BatchPrediction, PREDICTION_COLUMN};
use crate::domain::profile::REQUIRED_COLUMNS;
use crate::domain::table::DataTable;
use crate::infrastructure::csv::{write_table, CsvParser};
use crate::infrastructure::model::SharedModel;

pub const DOWNLOAD_FILE_NAME: &str = "predicted_salaries.csv";

pub struct BatchPredictionUseCase {
    model: SharedModel,
    preview_rows: usize,
}

impl BatchPredictionUseCase {
    pub fn new(model: SharedModel, preview_rows: usize) -> Self {
        Self {
            model,
            preview_rows,
        }
    }

    /// Only column presence is checked; cell values go to the model as-is.
    pub fn check_columns(table: &DataTable) -> Result<()> {
        let missing = table.missing_columns(&REQUIRED_COLUMNS);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingColumns(missing))
        }
    }

    pub fn execute(&self, upload: &[u8]) -> Result<BatchPrediction> {
        let start = Instant::now();
        let batch_id = Uuid::new_v4().to_string();

        let mut table = CsvParser::new().parse_bytes(upload)?;
        if let Err(err) = Self::check_columns(&table) {
            warn!(batch_id = %batch_id, error = %err, "Batch upload rejected");
            return Err(err);
        }

        let preview = table.head(self.preview_rows);
        let predictions = self.model.predict(&table)?;

        if predictions.len() != table.len() {
            return Err(AppError::PredictionError(format!(
                "model returned {} predictions for {} rows",
                predictions.len(),
                table.len()
            )));
        }

        if let Some(row) = predictions.iter().position(|p| !p.is_finite()) {
            return Err(AppError::PredictionError(format!(
                "model returned a non-finite salary for row {}",
                row + 1
            )));
        }

        table.set_column(
            PREDICTION_COLUMN,
            predictions.iter().map(f64::to_string).collect(),
        )?;
        let csv = write_table(&table)?;

        info!(
            batch_id = %batch_id,
            model = self.model.name(),
            rows = table.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch prediction complete"
        );

        Ok(BatchPrediction {
            batch_id,
            row_count: table.len(),
            preview,
            table,
            csv,
            file_name: DOWNLOAD_FILE_NAME.to_string(),
        })
    }
}
