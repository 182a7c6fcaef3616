use std::sync::{Arc, Mutex};

use tracing::{error, info};

use crate::application::{BatchPredictionUseCase, EvaluationUseCase, SinglePredictionUseCase};
use crate::domain::error::Result;
use crate::infrastructure::artifact_store::ArtifactLayout;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::model::{load_model, SharedModel};
use crate::infrastructure::reference_data::ReferenceOccupations;
use crate::interfaces::http::{add_log, AppState, LogEntry};

/// Load the process-wide artifacts and wire the use cases around them.
///
/// The model and the occupation set are read exactly once here and shared
/// read-only afterwards.
pub fn setup(config: AppConfig, logs: &Arc<Mutex<Vec<LogEntry>>>) -> Result<Arc<AppState>> {
    let layout = ArtifactLayout::new(&config.artifacts);

    let model = load_model(layout.model_path()).map_err(|err| {
        error!(error = %err, path = %layout.model_path().display(), "Failed to load model");
        err
    })?;

    let occupations = ReferenceOccupations::load(layout.dataset_path()).map_err(|err| {
        error!(
            error = %err,
            path = %layout.dataset_path().display(),
            "Failed to load reference dataset"
        );
        err
    })?;

    add_log(
        logs,
        "INFO",
        "Bootstrap",
        &format!(
            "Model {} ready, {} occupations loaded",
            model.name(),
            occupations.len()
        ),
    );

    Ok(Arc::new(build_state(config, layout, model, occupations)))
}

pub fn build_state(
    config: AppConfig,
    layout: ArtifactLayout,
    model: SharedModel,
    occupations: ReferenceOccupations,
) -> AppState {
    let occupations = Arc::new(occupations);

    let single_prediction = SinglePredictionUseCase::new(
        model.clone(),
        occupations.clone(),
        config.display.currency_symbol.clone(),
    );
    let batch_prediction = BatchPredictionUseCase::new(model.clone(), config.display.preview_rows);
    let evaluation = EvaluationUseCase::new(
        layout,
        config.evaluation.partial,
        config.evaluation.training_hint.clone(),
    );

    info!(
        evaluation_dir = %config.artifacts.evaluation_dir.display(),
        partial_evaluation = config.evaluation.partial,
        "Dashboard state ready"
    );

    AppState {
        config,
        model,
        occupations,
        single_prediction,
        batch_prediction,
        evaluation,
    }
}
