use serde::{Deserialize, Serialize};

/// Advisory produced by a plausibility rule. Never blocks a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlausibilityWarning {
    CeoRequiresEducation,
    ExperienceExceedsAge,
    RoleRequiresHigherEducation,
}

impl PlausibilityWarning {
    pub fn message(&self) -> &'static str {
        match self {
            PlausibilityWarning::CeoRequiresEducation => "10th pass student cannot be a CEO.",
            PlausibilityWarning::ExperienceExceedsAge => {
                "Experience exceeds realistic limit (Age - 18)."
            }
            PlausibilityWarning::RoleRequiresHigherEducation => {
                "This role typically requires Diploma/Bachelors or higher education."
            }
        }
    }
}

/// Wire form of a warning: stable code plus the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningView {
    pub code: PlausibilityWarning,
    pub message: String,
}

impl From<PlausibilityWarning> for WarningView {
    fn from(code: PlausibilityWarning) -> Self {
        Self {
            code,
            message: code.message().to_string(),
        }
    }
}
