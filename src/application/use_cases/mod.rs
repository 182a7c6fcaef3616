pub mod batch_prediction;
pub mod evaluation;
pub mod plausibility;
pub mod single_prediction;
