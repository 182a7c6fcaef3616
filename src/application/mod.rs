pub mod use_cases;

pub use use_cases::batch_prediction::BatchPredictionUseCase;
pub use use_cases::evaluation::EvaluationUseCase;
pub use use_cases::plausibility::check_profile;
pub use use_cases::single_prediction::SinglePredictionUseCase;
