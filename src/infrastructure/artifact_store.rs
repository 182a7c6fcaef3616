use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{GenericImageView, ImageFormat, ImageReader};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::ArtifactsConfig;

fn io_err(msg: impl Into<String>) -> AppError {
    AppError::IoError(msg.into())
}

/// File locations of the artifacts produced by the offline training step.
///
/// Relative paths resolve against the process working directory.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    model: PathBuf,
    dataset: PathBuf,
    evaluation: PathBuf,
}

impl ArtifactLayout {
    pub fn new(config: &ArtifactsConfig) -> Self {
        Self {
            model: config.model_path.clone(),
            dataset: config.dataset_path.clone(),
            evaluation: config.evaluation_dir.clone(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset
    }

    pub fn evaluation_image(&self, file_name: &str) -> PathBuf {
        self.evaluation.join(file_name)
    }
}

/// Read an artifact, mapping an absent file to `ArtifactMissing`.
pub fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::ArtifactMissing(path.display().to_string()),
        _ => io_err(format!("Failed to read {}: {e}", path.display())),
    })
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// A decodable image read from disk.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl LoadedImage {
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.to_mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Read `path` and decode it in full. Undecodable or truncated bytes count
/// as a missing artifact.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let bytes = read_artifact(path)?;

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| io_err(format!("Failed to inspect {}: {e}", path.display())))?;
    let format = reader.format().ok_or_else(|| {
        AppError::ArtifactMissing(format!("{} is not a recognised image", path.display()))
    })?;
    let (width, height) = reader
        .decode()
        .map_err(|e| {
            AppError::ArtifactMissing(format!("{} could not be decoded: {e}", path.display()))
        })?
        .dimensions();

    Ok(LoadedImage {
        format,
        width,
        height,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("artifacts-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_sha256_hex_known_value() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_read_missing_artifact() {
        let path = temp_dir().join("nope.bin");
        assert!(matches!(
            read_artifact(&path),
            Err(AppError::ArtifactMissing(_))
        ));
    }

    #[test]
    fn test_load_png_and_data_uri() {
        let dir = temp_dir();
        let path = dir.join("chart.png");
        image::RgbImage::new(3, 2).save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.format, ImageFormat::Png);
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert!(loaded.data_uri().starts_with("data:image/png;base64,"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_garbage_is_missing() {
        let dir = temp_dir();
        let path = dir.join("chart.png");
        fs::write(&path, b"definitely not an image").unwrap();

        assert!(matches!(
            load_image(&path),
            Err(AppError::ArtifactMissing(_))
        ));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_truncated_png_is_missing() {
        let dir = temp_dir();
        let path = dir.join("chart.png");
        image::RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 7 + y * 13) as u8, (x * y) as u8, (x ^ y) as u8])
        })
        .save(&path)
        .unwrap();
        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

        assert!(matches!(
            load_image(&path),
            Err(AppError::ArtifactMissing(_))
        ));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_layout_joins_evaluation_dir() {
        let config = ArtifactsConfig {
            model_path: PathBuf::from("m.json"),
            dataset_path: PathBuf::from("d.csv"),
            evaluation_dir: PathBuf::from("reports"),
        };
        let layout = ArtifactLayout::new(&config);
        assert_eq!(
            layout.evaluation_image("r2_scores.png"),
            PathBuf::from("reports").join("r2_scores.png")
        );
        assert_eq!(layout.model_path(), Path::new("m.json"));
    }
}
