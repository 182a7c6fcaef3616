use serde::{Deserialize, Serialize};

use super::table::DataTable;
use super::warning::WarningView;

/// Name of the column appended to batch uploads.
pub const PREDICTION_COLUMN: &str = "PredictedSalary";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinglePrediction {
    /// The row that was sent to the model
    pub input: DataTable,
    pub salary: f64,
    pub formatted: String,
    pub warnings: Vec<WarningView>,
    /// Transient success notice
    pub notice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPrediction {
    pub batch_id: String,
    pub row_count: usize,
    /// First rows of the upload, before predictions were added
    pub preview: DataTable,
    /// Full upload with the prediction column set
    pub table: DataTable,
    /// `table` serialized as UTF-8 CSV with a header row
    pub csv: String,
    pub file_name: String,
}
