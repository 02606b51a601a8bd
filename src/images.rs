//! Vehicle photo storage on the local filesystem
//!
//! Uploaded names are reduced to their base name and sanitised to
//! `[A-Za-z0-9._-]` before touching the disk, so no request can address a path
//! outside the upload directory.

use std::io::ErrorKind;
use std::path::PathBuf;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::ImageConfig;
use crate::error::{MarketError, MarketResult, ValidationError};

const FIELD: &str = "image";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeleteStatus {
    Deleted,
    NotFound,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteOutcome {
    pub image: String,
    pub status: DeleteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteReport {
    pub results: Vec<DeleteOutcome>,
}

impl DeleteReport {
    pub fn all_deleted(&self) -> bool {
        self.results
            .iter()
            .all(|r| r.status == DeleteStatus::Deleted)
    }
}

/// Base name of `raw` with every character outside `[A-Za-z0-9._-]` replaced by `_`
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    upload_dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl ImageStore {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Sanitised storage name for an uploaded file, or why it is refused
    pub fn accept(&self, file_name: Option<&str>) -> Result<String, ValidationError> {
        let raw = file_name.unwrap_or_default();
        let name = sanitize_file_name(raw);
        if name.trim_matches('.').is_empty() {
            return Err(ValidationError::EmptyField { field: FIELD });
        }
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidFormat {
                field: FIELD.to_string(),
                reason: format!(
                    "'{}' must have one of the extensions: {}",
                    raw,
                    self.allowed_extensions.join(", ")
                ),
            });
        }
        Ok(name)
    }

    /// Write an accepted file, returning its stored path
    pub async fn save(&self, name: &str, bytes: &[u8]) -> MarketResult<String> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| MarketError::Internal(format!("Cannot create upload dir: {}", e)))?;
        let path = self.upload_dir.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| MarketError::Internal(format!("Cannot write {}: {}", path.display(), e)))?;
        tracing::info!("[IMAGES] Stored {} ({} bytes)", path.display(), bytes.len());
        Ok(path.to_string_lossy().into_owned())
    }

    /// Delete every listed image, reporting each outcome in request order
    pub async fn delete_batch(&self, images: &[String]) -> MarketResult<DeleteReport> {
        if images.is_empty() {
            return Err(ValidationError::MissingField { field: "images" }.into());
        }
        let results = join_all(images.iter().map(|image| self.delete_one(image))).await;
        Ok(DeleteReport { results })
    }

    async fn delete_one(&self, image: &str) -> DeleteOutcome {
        let outcome = |status, reason| DeleteOutcome {
            image: image.to_string(),
            status,
            reason,
        };

        let name = sanitize_file_name(image);
        if name.trim_matches('.').is_empty() {
            return outcome(DeleteStatus::Failed, Some("invalid file name".to_string()));
        }
        match tokio::fs::remove_file(self.upload_dir.join(&name)).await {
            Ok(()) => outcome(DeleteStatus::Deleted, None),
            Err(e) if e.kind() == ErrorKind::NotFound => outcome(DeleteStatus::NotFound, None),
            Err(e) => {
                tracing::warn!("[IMAGES] Failed to delete {}: {}", name, e);
                outcome(DeleteStatus::Failed, Some(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> ImageStore {
        ImageStore::new(&ImageConfig {
            upload_dir: dir.path().to_string_lossy().into_owned(),
            ..ImageConfig::default()
        })
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\my car.JPG"), "my_car.JPG");
        assert_eq!(sanitize_file_name("seat ibiza (1).png"), "seat_ibiza__1_.png");
    }

    #[test]
    fn test_accept_checks_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.accept(Some("front.JPEG")).unwrap(), "front.JPEG");
        assert!(store.accept(Some("notes.txt")).is_err());
        assert!(store.accept(Some("noextension")).is_err());
        assert_eq!(
            store.accept(None).unwrap_err(),
            ValidationError::EmptyField { field: "image" }
        );
        assert!(store.accept(Some("..")).is_err());
    }

    #[tokio::test]
    async fn test_save_and_delete_batch() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let path = store.save("front.png", b"png-bytes").await.unwrap();
        assert!(std::path::Path::new(&path).exists());

        let report = store
            .delete_batch(&["static/images/front.png".to_string(), "missing.png".to_string()])
            .await
            .unwrap();
        assert!(!report.all_deleted());
        assert_eq!(report.results[0].status, DeleteStatus::Deleted);
        assert_eq!(report.results[1].status, DeleteStatus::NotFound);
        assert!(!dir.path().join("front.png").exists());
    }

    #[tokio::test]
    async fn test_delete_requires_a_list() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_in(&dir).delete_batch(&[]).await.unwrap_err();
        assert_eq!(err.http_status(), 400);
    }
}
