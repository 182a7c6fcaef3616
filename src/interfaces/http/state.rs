use std::sync::Arc;

use crate::application::{BatchPredictionUseCase, EvaluationUseCase, SinglePredictionUseCase};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::model::SharedModel;
use crate::infrastructure::reference_data::ReferenceOccupations;

/// Process-scoped state built once at startup and only read afterwards.
pub struct AppState {
    pub config: AppConfig,
    pub model: SharedModel,
    pub occupations: Arc<ReferenceOccupations>,
    pub single_prediction: SinglePredictionUseCase,
    pub batch_prediction: BatchPredictionUseCase,
    pub evaluation: EvaluationUseCase,
}
