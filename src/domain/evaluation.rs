use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageLayout {
    /// Rendered side by side with the other half-width image
    Half,
    Full,
}

/// A pre-rendered evaluation chart produced by the training step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationArtifact {
    pub file_name: &'static str,
    pub caption: &'static str,
    pub layout: ImageLayout,
}

/// Display order: two half-width charts, then three full-width.
pub const EVALUATION_ARTIFACTS: [EvaluationArtifact; 5] = [
    EvaluationArtifact {
        file_name: "r2_scores.png",
        caption: "R² Score",
        layout: ImageLayout::Half,
    },
    EvaluationArtifact {
        file_name: "rmse_scores.png",
        caption: "RMSE Score",
        layout: ImageLayout::Half,
    },
    EvaluationArtifact {
        file_name: "residuals_plot.png",
        caption: "Residuals Plot",
        layout: ImageLayout::Full,
    },
    EvaluationArtifact {
        file_name: "feature_importance.png",
        caption: "Feature Importances",
        layout: ImageLayout::Full,
    },
    EvaluationArtifact {
        file_name: "correlation_heatmap.png",
        caption: "Correlation Heatmap",
        layout: ImageLayout::Full,
    },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationImage {
    pub file_name: String,
    pub caption: String,
    pub layout: ImageLayout,
    pub width: u32,
    pub height: u32,
    /// `data:` URI holding the image bytes
    pub src: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationPanel {
    Ready {
        images: Vec<EvaluationImage>,
    },
    /// Only produced when per-image fallback is enabled.
    Partial {
        images: Vec<EvaluationImage>,
        missing: Vec<String>,
        message: String,
    },
    Unavailable {
        missing: Vec<String>,
        message: String,
    },
}
