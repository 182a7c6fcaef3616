pub mod linear;

use std::path::Path;
use std::sync::Arc;

use crate::domain::error::Result;
use crate::domain::table::DataTable;
use linear::LinearPipelineModel;

/// A fitted regressor: one prediction per input row, in row order.
///
/// Implementations select the feature columns they need by header name and
/// ignore any others.
pub trait SalaryModel {
    fn name(&self) -> &str;
    fn predict(&self, table: &DataTable) -> Result<Vec<f64>>;
}

pub type SharedModel = Arc<dyn SalaryModel + Send + Sync>;

/// Load the model artifact at `path`.
pub fn load_model(path: &Path) -> Result<SharedModel> {
    let model = LinearPipelineModel::from_path(path)?;
    Ok(Arc::new(model))
}
