use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use super::plausibility::check_profile;
use crate::domain::error::{AppError, Result};
use crate::domain::prediction::SinglePrediction;
use crate::domain::profile::EmployeeProfile;
use crate::domain::salary::format_currency;
use crate::infrastructure::model::SharedModel;
use crate::infrastructure::reference_data::ReferenceOccupations;

pub const PREDICTION_NOTICE: &str = "Prediction Complete!";

pub struct SinglePredictionUseCase {
    model: SharedModel,
    occupations: Arc<ReferenceOccupations>,
    currency_symbol: String,
}

impl SinglePredictionUseCase {
    pub fn new(
        model: SharedModel,
        occupations: Arc<ReferenceOccupations>,
        currency_symbol: String,
    ) -> Self {
        Self {
            model,
            occupations,
            currency_symbol,
        }
    }

    /// Reject profiles outside the input domains so the model only ever sees
    /// values the side panel could have produced.
    pub fn validate(&self, profile: &EmployeeProfile) -> Result<()> {
        profile
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if !self.occupations.contains(&profile.occupation) {
            return Err(AppError::ValidationError(format!(
                "unknown occupation: {}",
                profile.occupation
            )));
        }
        Ok(())
    }

    pub fn execute(&self, profile: &EmployeeProfile) -> Result<SinglePrediction> {
        self.validate(profile)?;

        let input = profile.to_table();
        let salary = self
            .model
            .predict(&input)?
            .first()
            .copied()
            .ok_or_else(|| {
                AppError::PredictionError("model returned no predictions".to_string())
            })?;

        if !salary.is_finite() {
            warn!(model = self.model.name(), "Model produced a non-finite salary");
            return Err(AppError::PredictionError(format!(
                "model produced a non-finite value ({})",
                salary
            )));
        }

        let formatted = format_currency(salary, &self.currency_symbol);
        info!(
            model = self.model.name(),
            occupation = %profile.occupation,
            salary,
            "Single prediction complete"
        );

        Ok(SinglePrediction {
            input,
            salary,
            formatted,
            warnings: check_profile(profile).into_iter().map(Into::into).collect(),
            notice: PREDICTION_NOTICE.to_string(),
        })
    }
}
