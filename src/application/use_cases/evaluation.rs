use tracing::{debug, warn};

use crate::domain::error::AppError;
use crate::domain::evaluation::{EvaluationImage, EvaluationPanel, EVALUATION_ARTIFACTS};
use crate::infrastructure::artifact_store::{load_image, ArtifactLayout};

pub struct EvaluationUseCase {
    layout: ArtifactLayout,
    partial: bool,
    training_hint: String,
}

impl EvaluationUseCase {
    pub fn new(layout: ArtifactLayout, partial: bool, training_hint: String) -> Self {
        Self {
            layout,
            partial,
            training_hint,
        }
    }

    fn fallback_message(&self) -> String {
        format!(
            "Some evaluation images are missing. Run `{}` to generate them.",
            self.training_hint
        )
    }

    /// Read every evaluation image. Unless partial rendering is enabled, one
    /// missing or unreadable image turns the whole panel into the fallback.
    pub fn execute(&self) -> EvaluationPanel {
        let mut images = Vec::with_capacity(EVALUATION_ARTIFACTS.len());
        let mut missing = Vec::new();

        for artifact in EVALUATION_ARTIFACTS {
            let path = self.layout.evaluation_image(artifact.file_name);
            match load_image(&path) {
                Ok(loaded) => {
                    debug!(
                        path = %path.display(),
                        width = loaded.width,
                        height = loaded.height,
                        "Loaded evaluation image"
                    );
                    images.push(EvaluationImage {
                        file_name: artifact.file_name.to_string(),
                        caption: artifact.caption.to_string(),
                        layout: artifact.layout,
                        width: loaded.width,
                        height: loaded.height,
                        src: loaded.data_uri(),
                    });
                }
                Err(err) => {
                    match &err {
                        AppError::ArtifactMissing(_) => {
                            warn!(path = %path.display(), "Evaluation image missing")
                        }
                        other => {
                            warn!(path = %path.display(), error = %other, "Evaluation image unreadable")
                        }
                    }
                    missing.push(artifact.file_name.to_string());
                }
            }
        }

        if missing.is_empty() {
            EvaluationPanel::Ready { images }
        } else if self.partial && !images.is_empty() {
            EvaluationPanel::Partial {
                images,
                missing,
                message: self.fallback_message(),
            }
        } else {
            EvaluationPanel::Unavailable {
                missing,
                message: self.fallback_message(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::ImageLayout;
    use crate::infrastructure::config::ArtifactsConfig;
    use std::fs;
    use std::path::PathBuf;

    fn evaluation_dir(skip: &[&str]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("evaluation-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        for artifact in EVALUATION_ARTIFACTS {
            if !skip.contains(&artifact.file_name) {
                image::RgbImage::new(4, 4)
                    .save(dir.join(artifact.file_name))
                    .unwrap();
            }
        }
        dir
    }

    fn use_case(dir: &PathBuf, partial: bool) -> EvaluationUseCase {
        let layout = ArtifactLayout::new(&ArtifactsConfig {
            evaluation_dir: dir.clone(),
            ..ArtifactsConfig::default()
        });
        EvaluationUseCase::new(layout, partial, "train.py".to_string())
    }

    #[test]
    fn test_all_images_present() {
        let dir = evaluation_dir(&[]);
        match use_case(&dir, false).execute() {
            EvaluationPanel::Ready { images } => {
                assert_eq!(images.len(), 5);
                assert_eq!(images[0].caption, "R² Score");
                assert_eq!(images[0].layout, ImageLayout::Half);
                assert_eq!(images[1].layout, ImageLayout::Half);
                assert!(images[2..].iter().all(|i| i.layout == ImageLayout::Full));
                assert!(images[4].src.starts_with("data:image/png;base64,"));
            }
            other => panic!("unexpected panel: {:?}", other),
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_one_missing_image_fails_whole_panel() {
        let dir = evaluation_dir(&["residuals_plot.png"]);
        match use_case(&dir, false).execute() {
            EvaluationPanel::Unavailable { missing, message } => {
                assert_eq!(missing, vec!["residuals_plot.png"]);
                assert!(message.contains("train.py"));
            }
            other => panic!("unexpected panel: {:?}", other),
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_image_counts_as_missing() {
        let dir = evaluation_dir(&[]);
        fs::write(dir.join("rmse_scores.png"), b"not a png").unwrap();
        assert!(matches!(
            use_case(&dir, false).execute(),
            EvaluationPanel::Unavailable { .. }
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_mode_renders_present_images() {
        let dir = evaluation_dir(&["r2_scores.png", "correlation_heatmap.png"]);
        match use_case(&dir, true).execute() {
            EvaluationPanel::Partial { images, missing, .. } => {
                assert_eq!(images.len(), 3);
                assert_eq!(missing, vec!["r2_scores.png", "correlation_heatmap.png"]);
            }
            other => panic!("unexpected panel: {:?}", other),
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_mode_with_nothing_present() {
        let dir = evaluation_dir(&EVALUATION_ARTIFACTS.map(|a| a.file_name));
        assert!(matches!(
            use_case(&dir, true).execute(),
            EvaluationPanel::Unavailable { .. }
        ));
        fs::remove_dir_all(&dir).ok();
    }
}
